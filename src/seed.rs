//! Seed data loaded into the registry at startup and on a data reset.

use crate::models::{
    AppRole, Coach, CoachStatus, Counter, InventoryItem, Staff, StaffStatus, TicketSalesRecord,
    Transaction, TransactionType, Trip, TripStatus, User,
};

pub const DEFAULT_SITE_NAME: &str = "Doel Express";
pub const DEFAULT_SITE_LOGO: &str = "/assets/doel-logo.webp";

// Seed accounts only; real accounts are hashed at DEFAULT_COST on signup.
const SEED_HASH_COST: u32 = 4;

fn seed_user(
    id: &str,
    username: &str,
    email: &str,
    password: &str,
    role: AppRole,
    created_at: &str,
) -> User {
    let password_hash = bcrypt::hash(password, SEED_HASH_COST).ok();
    if password_hash.is_none() {
        tracing::warn!("Failed to hash seed password for {username}");
    }
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        role,
        is_approved: true,
        created_at: created_at.to_string(),
        profile_photo: None,
        nid_photo: None,
    }
}

pub fn users() -> Vec<User> {
    vec![
        seed_user(
            "sa-001",
            "Super admin",
            "sa@doelexpress.com",
            "12345678",
            AppRole::SuperAdmin,
            "2024-01-01",
        ),
        seed_user(
            "sv-001",
            "Supervisor",
            "supervisor@doelexpress.com",
            "sv_doel_2025",
            AppRole::Supervisor,
            "2024-05-01",
        ),
        seed_user(
            "it-001",
            "IT User",
            "it@doelexpress.com",
            "it_doel_2025",
            AppRole::It,
            "2024-01-01",
        ),
        seed_user(
            "dv-001",
            "Driver User",
            "driver@doelexpress.com",
            "drv_doel_2025",
            AppRole::Driver,
            "2024-01-01",
        ),
        seed_user(
            "ad-001",
            "Admin User",
            "admin@doelexpress.com",
            "admin_doel_2025",
            AppRole::Admin,
            "2024-01-01",
        ),
    ]
}

fn coach(id: &str, coach_no: &str, reg_no: &str, seats: u32) -> Coach {
    Coach {
        id: id.to_string(),
        coach_no: coach_no.to_string(),
        reg_no: reg_no.to_string(),
        seats,
        status: CoachStatus::Active,
        gps_device_id: None,
    }
}

pub fn coaches() -> Vec<Coach> {
    vec![
        coach("C001", "C-101", "D-001", 40),
        coach("C002", "C-205", "D-005", 40),
        coach("C003", "C-308", "D-008", 36),
        coach("C004", "C-412", "D-012", 40),
    ]
}

#[allow(clippy::too_many_arguments)]
fn trip(
    id: &str,
    bus_number: &str,
    coach_no: &str,
    route: &str,
    departure_time: &str,
    status: TripStatus,
    driver: &str,
    guide_name: &str,
    capacity: u32,
    booked_seats: u32,
) -> Trip {
    Trip {
        id: id.to_string(),
        bus_number: bus_number.to_string(),
        coach_no: coach_no.to_string(),
        route: route.to_string(),
        departure_time: departure_time.to_string(),
        status,
        driver: driver.to_string(),
        guide_name: Some(guide_name.to_string()),
        capacity,
        booked_seats,
    }
}

pub fn trips() -> Vec<Trip> {
    vec![
        trip(
            "T101",
            "D-001",
            "C-101",
            "Dhaka - Chittagong",
            "2024-05-20 08:30 AM",
            TripStatus::OnTrip,
            "Rahim Uddin",
            "Sumon Ahmed",
            40,
            32,
        ),
        trip(
            "T102",
            "D-005",
            "C-205",
            "Dhaka - Sylhet",
            "2024-05-20 10:00 AM",
            TripStatus::Scheduled,
            "Karim Ahmed",
            "Akash Mia",
            40,
            15,
        ),
        trip(
            "T103",
            "D-008",
            "C-308",
            "Dhaka - Rajshahi",
            "2024-05-20 12:15 PM",
            TripStatus::Scheduled,
            "Selim Khan",
            "Biplob Das",
            36,
            8,
        ),
        trip(
            "T104",
            "D-012",
            "C-412",
            "Dhaka - Khulna",
            "2024-05-19 09:00 PM",
            TripStatus::Completed,
            "Jalal Mia",
            "Hasan Ali",
            40,
            40,
        ),
    ]
}

fn tx(
    id: &str,
    date: &str,
    tx_type: TransactionType,
    category: &str,
    amount: i64,
    description: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: date.to_string(),
        tx_type,
        category: category.to_string(),
        amount,
        description: description.to_string(),
        source_record_id: None,
        kind: None,
    }
}

pub fn transactions() -> Vec<Transaction> {
    vec![
        tx(
            "TX001",
            "2024-05-20",
            TransactionType::Income,
            "Ticket Sales",
            45000,
            "Counter Sales - Dhaka Station",
        ),
        tx(
            "TX002",
            "2024-05-20",
            TransactionType::Expense,
            "Fuel",
            12000,
            "Bus D-001 Refuel",
        ),
        tx(
            "TX003",
            "2024-05-19",
            TransactionType::Expense,
            "Maintenance",
            5500,
            "Brake repair for D-008",
        ),
        tx(
            "TX004",
            "2024-05-19",
            TransactionType::Income,
            "Online Booking",
            22500,
            "App bookings - Sylhet Route",
        ),
    ]
}

fn item(
    id: &str,
    name: &str,
    category: &str,
    stock: u32,
    min_stock: u32,
    unit: &str,
    last_updated: &str,
) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        stock,
        min_stock,
        unit: unit.to_string(),
        last_updated: last_updated.to_string(),
    }
}

pub fn inventory() -> Vec<InventoryItem> {
    vec![
        item(
            "INV001",
            "Radial Tire 295/80",
            "Tires",
            12,
            5,
            "pcs",
            "2024-05-18",
        ),
        item(
            "INV002",
            "Engine Oil 15W40",
            "Fluids",
            45,
            20,
            "Liters",
            "2024-05-19",
        ),
        item("INV003", "Brake Pad Set", "Brakes", 4, 10, "sets", "2024-05-15"),
        item(
            "INV004",
            "Lead Acid Battery 12V",
            "Electrical",
            8,
            4,
            "pcs",
            "2024-05-10",
        ),
    ]
}

fn member(id: &str, name: &str, role: &str, phone: &str, status: StaffStatus, salary: i64) -> Staff {
    Staff {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        phone: phone.to_string(),
        status,
        salary,
        photo: None,
        nid_photo: None,
        license_photo: None,
    }
}

pub fn staff() -> Vec<Staff> {
    vec![
        member(
            "EMP001",
            "Abdur Rahman",
            "Senior Driver",
            "01712345678",
            StaffStatus::Active,
            35000,
        ),
        member(
            "EMP002",
            "Sumon Ahmed",
            "Conductor",
            "01812345678",
            StaffStatus::Active,
            22000,
        ),
        member(
            "EMP003",
            "Nazrul Islam",
            "Mechanic",
            "01912345678",
            StaffStatus::Active,
            28000,
        ),
        member(
            "EMP004",
            "Farhana Akter",
            "Counter Manager",
            "01512345678",
            StaffStatus::OnLeave,
            25000,
        ),
    ]
}

pub fn ticket_sales() -> Vec<TicketSalesRecord> {
    let mut record = TicketSalesRecord {
        id: "REC001".to_string(),
        date: "2024-05-20".to_string(),
        reg_no: "D-001".to_string(),
        coach_no: "C-101".to_string(),
        driver_name: "Rahim Uddin".to_string(),
        guide_name: "Sumon Ahmed".to_string(),
        departure_date: "2024-05-20".to_string(),
        departure_seat_qty: 32,
        departure_taka: 27200,
        return_date: "2024-05-21".to_string(),
        return_seat_qty: 28,
        return_taka: 23800,
        total_taka: 0,
        diesel_ltr: 120.0,
        diesel_cost: 12000,
        trip_cost: 5000,
        total_cost: 0,
        net_profit: 0,
        abdullahpur_office: 1000,
        coxsbazar_office: 1500,
        sonargaon_office: 800,
        dmd: 2000,
        trip_id: None,
        counter_name: None,
        operator_name: None,
        tickets_sold: None,
        ticket_price: None,
        discount: None,
        sales_commission: None,
        total_amount: None,
        time: None,
        bus_number: None,
    };
    record.recompute();
    vec![record]
}

fn counter(
    id: &str,
    name: &str,
    location: &str,
    assigned_operator_id: Option<&str>,
    is_active: bool,
    last_sync: Option<&str>,
) -> Counter {
    Counter {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        assigned_operator_id: assigned_operator_id.map(str::to_string),
        is_active,
        last_sync: last_sync.map(str::to_string),
    }
}

pub fn counters() -> Vec<Counter> {
    vec![
        counter(
            "CNT-001",
            "Dhaka Main Counter",
            "Gabtoli, Dhaka",
            Some("sa-001"),
            true,
            Some("2024-05-20 09:00 AM"),
        ),
        counter(
            "CNT-002",
            "Chittagong Station",
            "Dampara, Chittagong",
            Some("it-001"),
            true,
            Some("2024-05-20 10:30 AM"),
        ),
        counter(
            "CNT-003",
            "Sylhet Gateway",
            "Kadamtali, Sylhet",
            Some("dv-001"),
            false,
            None,
        ),
    ]
}
