#[path = "gateway/decision_flow.rs"]
mod decision_flow;
#[path = "gateway/vault_save.rs"]
mod vault_save;
