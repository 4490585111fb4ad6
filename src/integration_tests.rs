#[cfg(test)]
mod tests {
    use crate::commands::auth::{authenticate, sign_up_internal, SignUpRequest};
    use crate::commands::counters::{create_counter_internal, CounterInput};
    use crate::commands::inventory::consume_stock_internal;
    use crate::commands::maintenance::{schedule_service_internal, ServiceRequest};
    use crate::commands::sales::{
        create_sales_record_internal, delete_sales_record_internal, record_counter_sale_internal,
        update_sales_record_internal, CounterSaleInput,
    };
    use crate::commands::settings;
    use crate::commands::trips::{
        create_trip_internal, finalize_trip_internal, update_trip_internal, TripInput,
    };
    use crate::commands::users::{update_user_internal, UserUpdate};
    use crate::error::DoelError;
    use crate::middleware::auth::Claims;
    use crate::models::{
        AppRole, InventoryItem, LedgerKind, PartSource, TicketSalesRecord, TransactionType,
        TripStatus, SUPER_ADMIN_ID,
    };
    use crate::registry::{find_by_id, Registry};
    use crate::state::AppState;
    use crate::storage::LocalStore;
    use axum::extract::{Json, Path, State};
    use axum::Extension;

    fn claims(role: AppRole) -> Claims {
        Claims {
            sub: "Test".to_string(),
            user_id: Some(SUPER_ADMIN_ID.to_string()),
            username: Some("Test".to_string()),
            role: Some(role),
            exp: 4102444800,
        }
    }

    fn test_state() -> AppState {
        AppState::seeded(LocalStore::in_memory())
    }

    fn record(id: &str, departure_taka: i64, diesel_cost: i64) -> TicketSalesRecord {
        TicketSalesRecord {
            id: id.to_string(),
            date: "2024-06-01".to_string(),
            reg_no: "D-001".to_string(),
            coach_no: "C-101".to_string(),
            driver_name: "Rahim Uddin".to_string(),
            guide_name: "Sumon Ahmed".to_string(),
            departure_date: "2024-06-01".to_string(),
            departure_seat_qty: 30,
            departure_taka,
            return_date: String::new(),
            return_seat_qty: 0,
            return_taka: 0,
            total_taka: 0,
            diesel_ltr: 0.0,
            diesel_cost,
            trip_cost: 0,
            total_cost: 0,
            net_profit: 0,
            abdullahpur_office: 0,
            coxsbazar_office: 0,
            sonargaon_office: 0,
            dmd: 0,
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
        }
    }

    fn tx_amount(registry: &Registry, id: &str) -> Option<i64> {
        find_by_id(&registry.transactions, id).map(|tx| tx.amount)
    }

    /// End-to-end synchronizer scenario: create, update, delete, with the
    /// derived pair tracking the record the whole way.
    #[test]
    fn test_sales_ledger_lifecycle() {
        let mut registry = Registry::seeded();
        let ledger_before = registry.transactions.len();

        let created =
            create_sales_record_internal(&mut registry, record("REC1", 1000, 400)).unwrap();
        assert_eq!(created.total_taka, 1000);
        assert_eq!(created.total_cost, 400);
        assert_eq!(created.net_profit, 600);
        assert_eq!(registry.transactions.len(), ledger_before + 2);
        assert_eq!(tx_amount(&registry, "TX-INC-REC1"), Some(1000));
        assert_eq!(tx_amount(&registry, "TX-EXP-REC1"), Some(400));

        let updated =
            update_sales_record_internal(&mut registry, "REC1", record("REC1", 1200, 500))
                .unwrap();
        assert_eq!(updated.total_taka, 1200);
        assert_eq!(registry.transactions.len(), ledger_before + 2);
        assert_eq!(tx_amount(&registry, "TX-INC-REC1"), Some(1200));
        assert_eq!(tx_amount(&registry, "TX-EXP-REC1"), Some(500));

        delete_sales_record_internal(&mut registry, "REC1").unwrap();
        assert_eq!(registry.transactions.len(), ledger_before);
        assert!(tx_amount(&registry, "TX-INC-REC1").is_none());
        assert!(tx_amount(&registry, "TX-EXP-REC1").is_none());
        assert!(find_by_id(&registry.ticket_sales, "REC1").is_none());
    }

    #[test]
    fn test_create_assigns_time_derived_id_and_recomputes() {
        let mut registry = Registry::seeded();
        let mut input = record("", 5000, 1500);
        input.total_taka = 99999;
        let created = create_sales_record_internal(&mut registry, input).unwrap();
        assert!(created.id.starts_with("REC-"));
        assert_eq!(created.total_taka, 5000);
        assert_eq!(created.total_cost, 1500);
        assert_eq!(created.net_profit, 3500);
        assert_eq!(
            tx_amount(&registry, &format!("TX-INC-{}", created.id)),
            Some(5000)
        );
    }

    #[test]
    fn test_duplicate_record_id_rejected() {
        let mut registry = Registry::seeded();
        create_sales_record_internal(&mut registry, record("REC1", 100, 10)).unwrap();
        let result = create_sales_record_internal(&mut registry, record("REC1", 100, 10));
        assert!(matches!(result, Err(DoelError::Validation(_))));
    }

    /// Derived transaction patching preserves id, date and type even when
    /// the record's own date moves.
    #[test]
    fn test_update_preserves_transaction_identity() {
        let mut registry = Registry::seeded();
        create_sales_record_internal(&mut registry, record("REC2", 800, 300)).unwrap();

        let mut updated = record("REC2", 900, 350);
        updated.date = "2024-07-15".to_string();
        updated.reg_no = "D-005".to_string();
        update_sales_record_internal(&mut registry, "REC2", updated).unwrap();

        let income = find_by_id(&registry.transactions, "TX-INC-REC2").unwrap();
        assert_eq!(income.date, "2024-06-01");
        assert_eq!(income.tx_type, TransactionType::Income);
        assert_eq!(income.amount, 900);
        assert!(income.description.contains("D-005"));
        assert_eq!(income.kind, Some(LedgerKind::TripIncome));
    }

    /// A derived entry deleted out of band is a tolerated gap: the update
    /// patches whatever half still exists and does not fail.
    #[test]
    fn test_update_skips_missing_derived_transaction() {
        let mut registry = Registry::seeded();
        create_sales_record_internal(&mut registry, record("REC3", 700, 200)).unwrap();
        crate::registry::remove_by_id(&mut registry.transactions, "TX-INC-REC3").unwrap();

        update_sales_record_internal(&mut registry, "REC3", record("REC3", 750, 250)).unwrap();
        assert!(tx_amount(&registry, "TX-INC-REC3").is_none());
        assert_eq!(tx_amount(&registry, "TX-EXP-REC3"), Some(250));
    }

    #[test]
    fn test_delete_leaves_other_transactions_alone() {
        let mut registry = Registry::seeded();
        create_sales_record_internal(&mut registry, record("REC4", 100, 50)).unwrap();
        create_sales_record_internal(&mut registry, record("REC5", 200, 60)).unwrap();

        delete_sales_record_internal(&mut registry, "REC4").unwrap();
        assert!(tx_amount(&registry, "TX-INC-REC4").is_none());
        assert_eq!(tx_amount(&registry, "TX-INC-REC5"), Some(200));
        // Seed ledger untouched.
        assert_eq!(tx_amount(&registry, "TX001"), Some(45000));

        let missing = delete_sales_record_internal(&mut registry, "REC4");
        assert!(matches!(missing, Err(DoelError::NotFound(_))));
    }

    #[test]
    fn test_consume_stock_deducts_and_stamps() {
        let mut registry = Registry::seeded();
        registry.inventory.push(InventoryItem {
            id: "INV-T".to_string(),
            name: "Test Filter".to_string(),
            category: "Filters".to_string(),
            stock: 5,
            min_stock: 2,
            unit: "pcs".to_string(),
            last_updated: "2024-01-01".to_string(),
        });

        let item = consume_stock_internal(&mut registry, "INV-T", 3).unwrap();
        assert_eq!(item.stock, 2);
        assert_ne!(item.last_updated, "2024-01-01");
    }

    /// The single authoritative guard: over-consumption is rejected, not
    /// clamped, and the stock stays put.
    #[test]
    fn test_consume_stock_rejects_insufficient() {
        let mut registry = Registry::seeded();
        registry.inventory.push(InventoryItem {
            id: "INV-T".to_string(),
            name: "Test Filter".to_string(),
            category: "Filters".to_string(),
            stock: 5,
            min_stock: 2,
            unit: "pcs".to_string(),
            last_updated: "2024-01-01".to_string(),
        });

        let result = consume_stock_internal(&mut registry, "INV-T", 8);
        assert!(matches!(
            result,
            Err(DoelError::InsufficientStock {
                stock: 5,
                requested: 8,
                ..
            })
        ));
        let item = find_by_id(&registry.inventory, "INV-T").unwrap();
        assert_eq!(item.stock, 5);
        assert_eq!(item.last_updated, "2024-01-01");

        let zero = consume_stock_internal(&mut registry, "INV-T", 0);
        assert!(matches!(zero, Err(DoelError::Validation(_))));
    }

    #[test]
    fn test_finalize_marks_completed_and_builds_draft() {
        let mut registry = Registry::seeded();
        let draft = finalize_trip_internal(&mut registry, "T102").unwrap();

        assert_eq!(draft.trip_id, "T102");
        assert_eq!(draft.reg_no, "D-005");
        assert_eq!(draft.coach_no, "C-205");
        assert_eq!(draft.driver_name, "Karim Ahmed");
        assert_eq!(draft.guide_name, "Akash Mia");
        assert_eq!(draft.departure_date, "2024-05-20");
        assert_eq!(draft.departure_seat_qty, 15);

        let trip = find_by_id(&registry.trips, "T102").unwrap();
        assert_eq!(trip.status, TripStatus::Completed);
    }

    /// Only the latest staged draft survives, and taking it is
    /// at-most-once.
    #[tokio::test]
    async fn test_sales_draft_overwrite_and_single_take() {
        let state = test_state();
        let admin = claims(AppRole::Admin);

        crate::commands::trips::finalize_trip(
            State(state.clone()),
            Extension(admin.clone()),
            Path("T102".to_string()),
        )
        .await
        .unwrap();
        crate::commands::trips::finalize_trip(
            State(state.clone()),
            Extension(admin.clone()),
            Path("T103".to_string()),
        )
        .await
        .unwrap();

        let Json(first) = crate::commands::sales::take_sales_draft(
            State(state.clone()),
            Extension(admin.clone()),
        )
        .await
        .unwrap();
        let draft = first.expect("latest draft must be staged");
        assert_eq!(draft.trip_id, "T103");
        assert_eq!(draft.reg_no, "D-008");

        let Json(second) =
            crate::commands::sales::take_sales_draft(State(state.clone()), Extension(admin))
                .await
                .unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_trip_snapshots_coach_and_validates_capacity() {
        let mut registry = Registry::seeded();
        let trip = create_trip_internal(
            &mut registry,
            TripInput {
                coach_id: "C003".to_string(),
                route: "Dhaka - Barisal".to_string(),
                departure_time: "2024-06-05T07:30".to_string(),
                driver: "Selim Khan".to_string(),
                guide_name: Some("Biplob Das".to_string()),
                status: TripStatus::Scheduled,
                booked_seats: None,
            },
        )
        .unwrap();
        assert_eq!(trip.bus_number, "D-008");
        assert_eq!(trip.coach_no, "C-308");
        assert_eq!(trip.capacity, 36);
        assert_eq!(trip.booked_seats, 0);
        assert_eq!(trip.departure_time, "2024-06-05 07:30");

        let overbooked = update_trip_internal(
            &mut registry,
            &trip.id,
            TripInput {
                coach_id: "C003".to_string(),
                route: "Dhaka - Barisal".to_string(),
                departure_time: "2024-06-05T07:30".to_string(),
                driver: "Selim Khan".to_string(),
                guide_name: None,
                status: TripStatus::Scheduled,
                booked_seats: Some(37),
            },
        );
        assert!(matches!(overbooked, Err(DoelError::Validation(_))));
    }

    #[test]
    fn test_counter_sale_builds_full_record_with_back_reference() {
        let mut registry = Registry::seeded();
        let ledger_before = registry.transactions.len();

        let record = record_counter_sale_internal(
            &mut registry,
            CounterSaleInput {
                counter_id: "CNT-001".to_string(),
                trip_id: "T101".to_string(),
                tickets_sold: 5,
                ticket_price: 850.0,
                discount: 100.0,
                sales_commission: 50.0,
            },
            "Farhana",
        )
        .unwrap();

        assert_eq!(record.total_taka, 4150);
        assert_eq!(record.net_profit, 4150);
        assert_eq!(record.trip_id.as_deref(), Some("T101"));
        assert_eq!(record.counter_name.as_deref(), Some("Dhaka Main Counter"));
        assert_eq!(record.operator_name.as_deref(), Some("Farhana"));
        assert_eq!(record.tickets_sold, Some(5));
        assert_eq!(record.total_amount, Some(4150));
        assert_eq!(record.reg_no, "D-001");

        assert_eq!(registry.transactions.len(), ledger_before + 2);
        assert_eq!(
            tx_amount(&registry, &format!("TX-INC-{}", record.id)),
            Some(4150)
        );
        assert_eq!(
            tx_amount(&registry, &format!("TX-EXP-{}", record.id)),
            Some(0)
        );

        let counter = find_by_id(&registry.counters, "CNT-001").unwrap();
        assert!(counter.last_sync.is_some());
    }

    #[test]
    fn test_counter_sale_rejects_inactive_counter() {
        let mut registry = Registry::seeded();
        let result = record_counter_sale_internal(
            &mut registry,
            CounterSaleInput {
                counter_id: "CNT-003".to_string(),
                trip_id: "T101".to_string(),
                tickets_sold: 2,
                ticket_price: 850.0,
                discount: 0.0,
                sales_commission: 0.0,
            },
            "Anyone",
        );
        assert!(matches!(result, Err(DoelError::Validation(_))));
    }

    #[test]
    fn test_counter_requires_existing_operator() {
        let mut registry = Registry::seeded();
        let result = create_counter_internal(
            &mut registry,
            CounterInput {
                name: "Ghost Counter".to_string(),
                location: "Nowhere".to_string(),
                assigned_operator_id: Some("no-such-user".to_string()),
                is_active: true,
            },
        );
        assert!(matches!(result, Err(DoelError::Validation(_))));

        let ok = create_counter_internal(
            &mut registry,
            CounterInput {
                name: "Feni Counter".to_string(),
                location: "Feni".to_string(),
                assigned_operator_id: Some("it-001".to_string()),
                is_active: true,
            },
        )
        .unwrap();
        assert_eq!(ok.assigned_operator_id.as_deref(), Some("it-001"));
    }

    /// The super-admin role is pinned; the rest of the update applies.
    #[test]
    fn test_super_admin_role_change_is_noop() {
        let mut registry = Registry::seeded();
        let updated = update_user_internal(
            &mut registry,
            SUPER_ADMIN_ID,
            UserUpdate {
                role: Some(AppRole::Driver),
                email: Some("root@doelexpress.com".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.role, AppRole::SuperAdmin);
        assert_eq!(updated.email, "root@doelexpress.com");

        // Other accounts change role freely.
        let other = update_user_internal(
            &mut registry,
            "it-001",
            UserUpdate {
                role: Some(AppRole::Manager),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(other.role, AppRole::Manager);
    }

    #[test]
    fn test_login_checks() {
        let mut registry = Registry::seeded();

        assert!(authenticate(&registry, "Super admin", "12345678").is_some());
        assert!(authenticate(&registry, "Super admin", "wrong-pass").is_none());
        assert!(authenticate(&registry, "Nobody", "12345678").is_none());

        // Fresh signups are unapproved and stay locked out until approved.
        let signup = sign_up_internal(
            &mut registry,
            SignUpRequest {
                username: "Counter Rima".to_string(),
                email: "rima@doelexpress.com".to_string(),
                password: Some("rima_doel_2025".to_string()),
            },
        )
        .unwrap();
        assert_eq!(signup.role, AppRole::Counter);
        assert!(!signup.is_approved);
        assert!(authenticate(&registry, "Counter Rima", "rima_doel_2025").is_none());

        update_user_internal(
            &mut registry,
            &signup.id,
            UserUpdate {
                is_approved: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(authenticate(&registry, "Counter Rima", "rima_doel_2025").is_some());

        let duplicate = sign_up_internal(
            &mut registry,
            SignUpRequest {
                username: "Counter Rima".to_string(),
                email: "other@doelexpress.com".to_string(),
                password: None,
            },
        );
        assert!(matches!(duplicate, Err(DoelError::Validation(_))));
    }

    #[test]
    fn test_service_request_consumes_inventory() {
        let mut registry = Registry::seeded();

        let ticket = schedule_service_internal(
            &mut registry,
            ServiceRequest {
                bus_id: "D-008".to_string(),
                part_source: PartSource::Inventory,
                part_id: Some("INV003".to_string()),
                external_part_name: None,
                supplier_name: None,
                quantity: 2,
                notes: "Front brake overhaul".to_string(),
            },
        )
        .unwrap();
        assert_eq!(ticket.part_name, "Brake Pad Set");
        assert_eq!(
            find_by_id(&registry.inventory, "INV003").unwrap().stock,
            2
        );
        assert_eq!(registry.service_tickets.len(), 1);

        // Insufficient stock fails the whole request; no ticket is left.
        let rejected = schedule_service_internal(
            &mut registry,
            ServiceRequest {
                bus_id: "D-008".to_string(),
                part_source: PartSource::Inventory,
                part_id: Some("INV003".to_string()),
                external_part_name: None,
                supplier_name: None,
                quantity: 10,
                notes: String::new(),
            },
        );
        assert!(matches!(
            rejected,
            Err(DoelError::InsufficientStock { .. })
        ));
        assert_eq!(registry.service_tickets.len(), 1);

        let external = schedule_service_internal(
            &mut registry,
            ServiceRequest {
                bus_id: "D-012".to_string(),
                part_source: PartSource::ThirdParty,
                part_id: None,
                external_part_name: Some("Turbocharger".to_string()),
                supplier_name: Some("Chittagong Motors".to_string()),
                quantity: 1,
                notes: String::new(),
            },
        )
        .unwrap();
        assert_eq!(external.supplier_name.as_deref(), Some("Chittagong Motors"));
        assert_eq!(
            find_by_id(&registry.inventory, "INV003").unwrap().stock,
            2
        );
    }

    /// Handlers enforce the same screen table the gate resolves.
    #[tokio::test]
    async fn test_handlers_enforce_screen_permissions() {
        let state = test_state();

        let denied = crate::commands::finance::get_transactions(
            State(state.clone()),
            Extension(claims(AppRole::Driver)),
        )
        .await;
        assert!(matches!(denied, Err(DoelError::Forbidden(_))));

        let allowed = crate::commands::finance::get_transactions(
            State(state.clone()),
            Extension(claims(AppRole::Accounts)),
        )
        .await;
        assert!(allowed.is_ok());
    }

    #[tokio::test]
    async fn test_data_reset_is_super_admin_only() {
        let state = test_state();

        {
            let mut registry = state.registry.lock().unwrap();
            create_sales_record_internal(&mut registry, record("REC9", 100, 10)).unwrap();
            assert_eq!(registry.ticket_sales.len(), 2);
        }

        let denied =
            settings::reset_data(State(state.clone()), Extension(claims(AppRole::Admin))).await;
        assert!(matches!(denied, Err(DoelError::Forbidden(_))));

        settings::reset_data(State(state.clone()), Extension(claims(AppRole::SuperAdmin)))
            .await
            .unwrap();
        let registry = state.registry.lock().unwrap();
        assert_eq!(registry.ticket_sales.len(), 1);
        assert!(find_by_id(&registry.transactions, "TX-INC-REC9").is_none());
    }
}
