#[cfg(test)]
mod tests {
    use crate::commands::finance::ledger_totals;
    use crate::commands::hr::{is_active_driver, is_active_guide};
    use crate::commands::reports::{export_csv, CSV_HEADERS};
    use crate::commands::sales::{derived_transactions, filter_records, SalesFilter};
    use crate::models::{
        AppRole, LedgerKind, Staff, StaffStatus, TicketSalesRecord, TransactionType,
    };
    use crate::permissions::{allowed_roles, has_permission, SCREEN_IDS};
    use crate::registry::{time_id, Registry};
    use crate::state::InsightBoard;

    fn sample_record(id: &str) -> TicketSalesRecord {
        let mut record = TicketSalesRecord {
            id: id.to_string(),
            date: "2024-06-01".to_string(),
            reg_no: "D-001".to_string(),
            coach_no: "C-101".to_string(),
            driver_name: "Rahim Uddin".to_string(),
            guide_name: "Sumon Ahmed".to_string(),
            departure_date: "2024-06-01".to_string(),
            departure_seat_qty: 30,
            departure_taka: 25000,
            return_date: "2024-06-02".to_string(),
            return_seat_qty: 20,
            return_taka: 17000,
            total_taka: 0,
            diesel_ltr: 110.0,
            diesel_cost: 11000,
            trip_cost: 4000,
            total_cost: 0,
            net_profit: 0,
            abdullahpur_office: 500,
            coxsbazar_office: 700,
            sonargaon_office: 300,
            dmd: 1000,
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
        record
    }

    /// Every (screen, role) pair resolves exactly as the static table says,
    /// on every call.
    #[test]
    fn test_permission_matrix_is_deterministic() {
        for screen in SCREEN_IDS {
            let roles = allowed_roles(screen).expect("known screen must be mapped");
            for role in AppRole::ALL {
                let expected = roles.contains(&role);
                assert_eq!(has_permission(screen, role), expected);
                assert_eq!(has_permission(screen, role), expected);
            }
        }
    }

    #[test]
    fn test_unknown_screen_always_denies() {
        for role in AppRole::ALL {
            assert!(!has_permission("tracking", role));
            assert!(!has_permission("", role));
            assert!(!has_permission("Dashboard", role));
        }
    }

    #[test]
    fn test_permission_matrix_spot_checks() {
        // Everyone sees the dashboard and settings.
        for role in AppRole::ALL {
            assert!(has_permission("dashboard", role));
            assert!(has_permission("settings", role));
        }
        // Finance is tight.
        assert!(has_permission("finance", AppRole::Accounts));
        assert!(!has_permission("finance", AppRole::Manager));
        assert!(!has_permission("finance", AppRole::Counter));
        // User management is super admin + IT only.
        let user_mgmt: Vec<AppRole> = AppRole::ALL
            .into_iter()
            .filter(|role| has_permission("userManagement", *role))
            .collect();
        assert_eq!(user_mgmt, vec![AppRole::SuperAdmin, AppRole::It]);
        // Drivers see nothing operational.
        assert!(!has_permission("scheduling", AppRole::Driver));
        assert!(!has_permission("ticketSalesRecord", AppRole::Driver));
    }

    #[test]
    fn test_recompute_ignores_authored_totals() {
        let mut record = sample_record("REC-X");
        record.total_taka = 1;
        record.total_cost = 2;
        record.net_profit = 3;
        record.recompute();
        assert_eq!(record.total_taka, 42000);
        assert_eq!(record.total_cost, 15000);
        assert_eq!(record.net_profit, 27000);
    }

    #[test]
    fn test_derived_pair_shape() {
        let record = sample_record("REC-77");
        let (income, expense) = derived_transactions(&record);

        assert_eq!(income.id, "TX-INC-REC-77");
        assert_eq!(income.tx_type, TransactionType::Income);
        assert_eq!(income.category, "Ticket Sales");
        assert_eq!(income.amount, record.total_taka);
        assert_eq!(income.source_record_id.as_deref(), Some("REC-77"));
        assert_eq!(income.kind, Some(LedgerKind::TripIncome));
        assert!(income.description.contains("D-001"));
        assert!(income.description.contains("C-101"));

        assert_eq!(expense.id, "TX-EXP-REC-77");
        assert_eq!(expense.tx_type, TransactionType::Expense);
        assert_eq!(expense.category, "Trip Operating Cost");
        assert_eq!(expense.amount, record.total_cost);
        assert_eq!(expense.kind, Some(LedgerKind::TripExpense));
        assert_eq!(expense.date, record.date);
    }

    #[test]
    fn test_ledger_totals() {
        let registry = Registry::seeded();
        let totals = ledger_totals(&registry.transactions);
        assert_eq!(totals.income, 45000 + 22500);
        assert_eq!(totals.expense, 12000 + 5500);
        assert_eq!(totals.balance, totals.income - totals.expense);
    }

    #[test]
    fn test_crew_classification_by_role_substring() {
        let mut member = Staff {
            id: "EMP-T1".to_string(),
            name: "Test".to_string(),
            role: "Senior Driver".to_string(),
            phone: String::new(),
            status: StaffStatus::Active,
            salary: 0,
            photo: None,
            nid_photo: None,
            license_photo: None,
        };
        assert!(is_active_driver(&member));
        assert!(!is_active_guide(&member));

        member.role = "Conductor".to_string();
        assert!(!is_active_driver(&member));
        assert!(is_active_guide(&member));

        member.role = "Tour Guide".to_string();
        assert!(is_active_guide(&member));

        member.status = StaffStatus::OnLeave;
        assert!(!is_active_guide(&member));

        member.role = "Mechanic".to_string();
        member.status = StaffStatus::Active;
        assert!(!is_active_driver(&member));
        assert!(!is_active_guide(&member));
    }

    /// A slow early insight fetch must not clobber a newer one.
    #[test]
    fn test_insight_board_discards_stale_result() {
        let board = InsightBoard::default();
        let first = board.begin();
        let second = board.begin();

        assert!(board.publish(second, "fresh analysis".to_string()));
        assert!(!board.publish(first, "stale analysis".to_string()));
        assert_eq!(board.latest().as_deref(), Some("fresh analysis"));
    }

    #[test]
    fn test_insight_board_accepts_latest_generation() {
        let board = InsightBoard::default();
        assert!(board.latest().is_none());
        let ticket = board.begin();
        assert!(board.publish(ticket, "only one".to_string()));
        assert_eq!(board.latest().as_deref(), Some("only one"));
    }

    #[test]
    fn test_csv_export_shape() {
        let registry = Registry::seeded();
        let csv = export_csv(&registry);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADERS.join(",").as_str()));
        assert!(csv.contains("Summary,Total Trips Run,4,Monthly period"));
        assert!(csv.contains("Route Performance,Dhaka - Khulna,40,Passengers"));
        assert!(csv.contains("Income Channels,Ticket Sales,45000,Revenue"));
    }

    #[test]
    fn test_sales_filters() {
        let records = vec![sample_record("REC-A"), {
            let mut other = sample_record("REC-B");
            other.date = "2024-06-10".to_string();
            other.reg_no = "D-012".to_string();
            other.driver_name = "Jalal Mia".to_string();
            other.recompute();
            other
        }];

        let by_reg = filter_records(
            &records,
            &SalesFilter {
                q: Some("d-012".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_reg.len(), 1);
        assert_eq!(by_reg[0].id, "REC-B");

        let by_driver = filter_records(
            &records,
            &SalesFilter {
                q: Some("rahim".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_driver.len(), 1);
        assert_eq!(by_driver[0].id, "REC-A");

        let by_range = filter_records(
            &records,
            &SalesFilter {
                start_date: Some("2024-06-05".to_string()),
                end_date: Some("2024-06-30".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_range.len(), 1);
        assert_eq!(by_range[0].id, "REC-B");

        let all = filter_records(&records, &SalesFilter::default());
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_time_ids_are_unique_and_prefixed() {
        let a = time_id("REC-");
        let b = time_id("REC-");
        assert!(a.starts_with("REC-"));
        assert_ne!(a, b);
    }
}
