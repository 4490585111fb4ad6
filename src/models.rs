use serde::{Deserialize, Serialize};

/// Fixed id of the one distinguished super-admin account. Its role can
/// never be changed away from [`AppRole::SuperAdmin`].
pub const SUPER_ADMIN_ID: &str = "sa-001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppRole {
    SuperAdmin,
    ManagingDirector,
    Director,
    Admin,
    Accounts,
    Hr,
    It,
    Sales,
    Purchase,
    Marketing,
    Manager,
    Counter,
    Driver,
    Supervisor,
}

impl AppRole {
    pub const ALL: [AppRole; 14] = [
        AppRole::SuperAdmin,
        AppRole::ManagingDirector,
        AppRole::Director,
        AppRole::Admin,
        AppRole::Accounts,
        AppRole::Hr,
        AppRole::It,
        AppRole::Sales,
        AppRole::Purchase,
        AppRole::Marketing,
        AppRole::Manager,
        AppRole::Counter,
        AppRole::Driver,
        AppRole::Supervisor,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Bcrypt hash; accounts without one accept any password at login.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password_hash: Option<String>,
    pub role: AppRole,
    pub is_approved: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nid_photo: Option<String>,
}

/// User as sent to clients and mirrored to local storage (no hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: AppRole,
    pub is_approved: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nid_photo: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role,
            is_approved: u.is_approved,
            created_at: u.created_at.clone(),
            profile_photo: u.profile_photo.clone(),
            nid_photo: u.nid_photo.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoachStatus {
    Active,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: String,
    pub coach_no: String,
    pub reg_no: String,
    pub seats: u32,
    pub status: CoachStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gps_device_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    Scheduled,
    #[serde(rename = "On Trip")]
    OnTrip,
    Completed,
    Delayed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    /// Registration plate snapshot; becomes regNo on a sales record.
    pub bus_number: String,
    pub coach_no: String,
    pub route: String,
    pub departure_time: String,
    pub status: TripStatus,
    pub driver: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub guide_name: Option<String>,
    pub capacity: u32,
    pub booked_seats: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub min_stock: u32,
    pub unit: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

/// Which half of a sales record's derived ledger pair a transaction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerKind {
    TripIncome,
    TripExpense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub category: String,
    pub amount: i64,
    pub description: String,
    /// Explicit link to the ticket-sales record this entry mirrors, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<LedgerKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffStatus {
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    /// Free text; drivers and guides are classified by substring match.
    pub role: String,
    pub phone: String,
    pub status: StaffStatus,
    pub salary: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nid_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub license_photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assigned_operator_id: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_sync: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSalesRecord {
    #[serde(default)]
    pub id: String,
    pub date: String,
    pub reg_no: String,
    pub coach_no: String,
    pub driver_name: String,
    pub guide_name: String,
    pub departure_date: String,
    pub departure_seat_qty: u32,
    pub departure_taka: i64,
    pub return_date: String,
    pub return_seat_qty: u32,
    pub return_taka: i64,
    /// Always recomputed from departureTaka + returnTaka.
    #[serde(default)]
    pub total_taka: i64,
    pub diesel_ltr: f64,
    pub diesel_cost: i64,
    pub trip_cost: i64,
    /// Always recomputed from dieselCost + tripCost.
    #[serde(default)]
    pub total_cost: i64,
    /// Always recomputed from totalTaka - totalCost.
    #[serde(default)]
    pub net_profit: i64,
    pub abdullahpur_office: i64,
    pub coxsbazar_office: i64,
    pub sonargaon_office: i64,
    pub dmd: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub counter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operator_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tickets_sold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ticket_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sales_commission: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bus_number: Option<String>,
}

impl TicketSalesRecord {
    /// Derived fields are never authored directly; this is the single
    /// recompute step run after any field-level mutation.
    pub fn recompute(&mut self) {
        self.total_taka = self.departure_taka + self.return_taka;
        self.total_cost = self.diesel_cost + self.trip_cost;
        self.net_profit = self.total_taka - self.total_cost;
    }
}

/// Prefilled sales form staged by finalizing a trip. Consumed at most once;
/// a later finalize overwrites whatever was staged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDraft {
    pub trip_id: String,
    pub reg_no: String,
    pub coach_no: String,
    pub driver_name: String,
    pub guide_name: String,
    pub departure_date: String,
    pub departure_seat_qty: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartSource {
    #[serde(rename = "inventory")]
    Inventory,
    #[serde(rename = "third-party")]
    ThirdParty,
}

/// Maintenance service request raised against a coach.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTicket {
    pub id: String,
    pub bus_id: String,
    pub source: PartSource,
    pub part_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub supplier_name: Option<String>,
    pub quantity: u32,
    pub notes: String,
    pub created_at: String,
}
