//! Text rendering of the moderation dashboard.

use super::data_table::{DataTableConfig, TableColumn};
use crate::console::ConsoleSnapshot;
use crate::models::{PurchaseRequest, UserSummary};

const LOADING: &str = "Loading...";

/// Label of the requests tab, with a count badge when non-zero.
#[must_use]
pub fn requests_tab_label(pending: usize) -> String {
    if pending == 0 {
        "Purchase requests".to_string()
    } else {
        format!("Purchase requests [{pending}]")
    }
}

#[must_use]
pub fn requests_table_config() -> DataTableConfig {
    DataTableConfig::new("purchase_requests")
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::new("player", "Player"))
        .column(TableColumn::new("steam_id", "Steam ID"))
        .column(TableColumn::new("privilege", "Privilege"))
        .column(TableColumn::new("duration", "Duration"))
        .column(TableColumn::new("price", "Price"))
        .column(TableColumn::new("created", "Created"))
        .column(TableColumn::new("proof", "Payment proof").visible(false))
        .empty_state("No new requests")
}

#[must_use]
pub fn users_table_config() -> DataTableConfig {
    DataTableConfig::new("users")
        .column(TableColumn::new("player", "Player"))
        .column(TableColumn::new("steam_id", "Steam ID"))
        .column(TableColumn::new("privileges", "Privileges"))
        .column(TableColumn::new("registered", "Registered"))
        .empty_state("No users")
}

fn request_row(request: &PurchaseRequest) -> Vec<String> {
    vec![
        request.id.to_string(),
        request.user.steam_name.clone(),
        request.user.steam_id.clone(),
        request.privilege_type.clone(),
        request.duration_label().to_string(),
        request.price().to_string(),
        request.created_at.display_minutes(),
        request.payment_proof.clone().unwrap_or_default(),
    ]
}

fn user_row(user: &UserSummary) -> Vec<String> {
    vec![
        user.steam_name.clone(),
        user.steam_id.clone(),
        format!("{} active", user.privilege_count),
        user.created_at.display_date(),
    ]
}

/// Render the pending requests table.
#[must_use]
pub fn render_requests(requests: &[PurchaseRequest], loading: bool) -> String {
    if loading {
        return format!("{LOADING}\n");
    }
    let rows: Vec<Vec<String>> = requests.iter().map(request_row).collect();
    requests_table_config().render(&rows)
}

/// Render a single request with every field, payment proof included.
#[must_use]
pub fn render_request_detail(request: &PurchaseRequest) -> String {
    let status = request
        .status
        .map_or_else(|| "pending".to_string(), |s| s.to_string());
    format!(
        "Request #{id}\n\
         Player:    {name} ({steam_id})\n\
         Privilege: {tier}\n\
         Duration:  {duration}\n\
         Price:     {price}\n\
         Proof:     {proof}\n\
         Created:   {created}\n\
         Status:    {status}\n",
        id = request.id,
        name = request.user.steam_name,
        steam_id = request.user.steam_id,
        tier = request.privilege_type,
        duration = request.duration_label(),
        price = request.price(),
        proof = request.payment_proof.as_deref().unwrap_or("-"),
        created = request.created_at.display_minutes(),
    )
}

/// Render the users table.
#[must_use]
pub fn render_users(users: &[UserSummary], loading: bool) -> String {
    if loading {
        return format!("{LOADING}\n");
    }
    let rows: Vec<Vec<String>> = users.iter().map(user_row).collect();
    users_table_config().render(&rows)
}

/// Render both tabs of the dashboard.
#[must_use]
pub fn render_dashboard(snapshot: &ConsoleSnapshot) -> String {
    format!(
        "== {} ==\n{}\n== Users ==\n{}",
        requests_tab_label(snapshot.pending_count()),
        render_requests(&snapshot.requests, snapshot.loading),
        render_users(&snapshot.users, snapshot.loading),
    )
}
