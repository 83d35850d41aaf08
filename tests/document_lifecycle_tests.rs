use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use lostdocs::config::Config;
use lostdocs::domain::clock::FixedClock;
use lostdocs::domain::{DocumentId, ListFilter, UserId};
use lostdocs::entities::lost_documents::DocumentStatus;
use lostdocs::models::document::{DocumentInput, LostItemInput, ResidentInput};
use lostdocs::services::{CreateUserRequest, DocumentError, SettingsError, SetupRequest};
use lostdocs::state::SharedState;

struct Harness {
    state: SharedState,
    clock: Arc<FixedClock>,
    admin: UserId,
    operator: UserId,
    dir: PathBuf,
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// 10:00 in Jakarta.
fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 3, 0, 0).unwrap()
}

async fn harness(start: DateTime<Utc>) -> Harness {
    let dir = std::env::temp_dir().join(format!("lostdocs-lifecycle-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", dir.join("lostdocs.db").display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let clock = Arc::new(FixedClock::new(start));
    let state = SharedState::with_clock(config, clock.clone())
        .await
        .expect("Failed to create shared state");

    let request: SetupRequest = serde_json::from_value(serde_json::json!({
        "office_name": "Polsek Coblong",
        "letter_place": "Bandung",
        "number_format": "SKH/%03d/%s/%d",
        "timezone": "Asia/Jakarta",
        "archive_duration_days": "15",
        "admin_full_name": "Budi Santoso",
        "admin_nrp": "87050123",
        "admin_password": "rahasia-admin"
    }))
    .unwrap();
    state.settings_service.complete_setup(request).await.unwrap();

    let admin = state
        .auth_service
        .login("87050123", "rahasia-admin")
        .await
        .unwrap()
        .id;

    let operator = create_operator(&state, admin, "95110001").await;

    Harness {
        state,
        clock,
        admin,
        operator,
        dir,
    }
}

async fn create_operator(state: &SharedState, admin: UserId, nrp: &str) -> UserId {
    let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
        "full_name": format!("Operator {nrp}"),
        "nrp": nrp,
        "password": "rahasia-operator"
    }))
    .unwrap();
    state.user_service.create_user(request, admin).await.unwrap().id
}

fn input(officer: UserId, name: &str) -> DocumentInput {
    DocumentInput {
        resident: ResidentInput {
            full_name: name.to_string(),
            birth_place: "Bandung".to_string(),
            birth_date: "1990-04-12".to_string(),
            sex: "L".to_string(),
            religion: "Islam".to_string(),
            occupation: "Wiraswasta".to_string(),
            address: "Jl. Dago 10".to_string(),
        },
        loss_location: "Jl. Dago".to_string(),
        reporting_officer_id: officer.value(),
        approving_official_id: None,
        items: vec![LostItemInput {
            item_name: "KTP".to_string(),
            description: String::new(),
        }],
    }
}

impl Harness {
    async fn create(&self, name: &str) -> lostdocs::services::LostDocumentDetail {
        self.state
            .document_service
            .create(input(self.operator, name), self.operator)
            .await
            .unwrap()
    }

    async fn set(&self, key: &str, value: &str) {
        let values = HashMap::from([(key.to_string(), value.to_string())]);
        self.state
            .settings_service
            .update_settings(values, self.admin)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn numbers_run_per_year_in_office_timezone() {
    let h = harness(at(2026, 3, 10)).await;

    assert_eq!(h.create("Asep").await.document_number, "SKH/001/III/2026");
    assert_eq!(h.create("Dewi").await.document_number, "SKH/002/III/2026");

    h.clock.set(at(2026, 11, 2));
    assert_eq!(h.create("Rudi").await.document_number, "SKH/003/XI/2026");

    // 01:00 on 1 January in Jakarta while UTC is still on 31 December.
    h.clock
        .set(Utc.with_ymd_and_hms(2026, 12, 31, 18, 0, 0).unwrap());
    assert_eq!(
        h.state
            .document_service
            .preview_next_number()
            .await
            .unwrap(),
        "SKH/001/I/2027"
    );
    assert_eq!(h.create("Wati").await.document_number, "SKH/001/I/2027");
}

#[tokio::test]
async fn configured_last_number_raises_the_sequence() {
    let h = harness(at(2026, 5, 4)).await;

    h.set("last_number", "41").await;
    assert_eq!(h.create("Asep").await.document_number, "SKH/042/V/2026");

    // A lower configured value never moves the sequence backwards.
    h.set("last_number", "5").await;
    assert_eq!(h.create("Dewi").await.document_number, "SKH/043/V/2026");
}

#[tokio::test]
async fn deleted_numbers_are_issued_again() {
    let h = harness(at(2026, 6, 1)).await;

    let first = h.create("Asep").await;
    h.state
        .document_service
        .delete(first.id, h.operator)
        .await
        .unwrap();

    let err = h
        .state
        .document_service
        .find_by_id(first.id, h.operator)
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::NotFound(_)));

    let second = h.create("Dewi").await;
    assert_eq!(second.document_number, first.document_number);
}

#[tokio::test]
async fn status_archives_after_the_configured_duration() {
    let start = at(2026, 7, 1);
    let h = harness(start).await;
    let doc = h.create("Asep").await;
    assert_eq!(doc.status, DocumentStatus::Issued);

    h.clock.set(start + Duration::days(15));
    let fetched = h
        .state
        .document_service
        .find_by_id(doc.id, h.operator)
        .await
        .unwrap();
    assert_eq!(fetched.status, DocumentStatus::Issued);
    let active = h
        .state
        .document_service
        .find_all(None, ListFilter::Active)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);

    h.clock.advance(Duration::seconds(1));
    let fetched = h
        .state
        .document_service
        .find_by_id(doc.id, h.operator)
        .await
        .unwrap();
    assert_eq!(fetched.status, DocumentStatus::Archived);

    let active = h
        .state
        .document_service
        .find_all(None, ListFilter::Active)
        .await
        .unwrap();
    assert!(active.is_empty());
    let archived = h
        .state
        .document_service
        .find_all(None, ListFilter::Archived)
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].status, DocumentStatus::Archived);

    // Search spans both halves.
    let found = h.state.document_service.search_global("asep").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn settings_changes_are_visible_immediately() {
    let start = at(2026, 8, 1);
    let h = harness(start).await;
    let doc = h.create("Asep").await;

    h.clock.set(start + Duration::days(20));
    let fetched = h
        .state
        .document_service
        .find_by_id(doc.id, h.admin)
        .await
        .unwrap();
    assert_eq!(fetched.status, DocumentStatus::Archived);

    h.set("archive_duration_days", "30").await;
    let fetched = h
        .state
        .document_service
        .find_by_id(doc.id, h.admin)
        .await
        .unwrap();
    assert_eq!(fetched.status, DocumentStatus::Issued);
}

#[tokio::test]
async fn oversized_archive_duration_is_rejected_and_capped() {
    let start = at(2026, 8, 1);
    let h = harness(start).await;
    let doc = h.create("Asep").await;

    let err = h
        .state
        .settings_service
        .update_settings(
            HashMap::from([(
                "archive_duration_days".to_string(),
                "100000000".to_string(),
            )]),
            h.admin,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettingsError::Validation(_)));

    // A restored database can still carry such a value.
    h.state
        .config_cache
        .save(&HashMap::from([(
            "archive_duration_days".to_string(),
            "100000000".to_string(),
        )]))
        .await
        .unwrap();
    h.clock.set(start + Duration::days(400));

    let fetched = h
        .state
        .document_service
        .find_by_id(doc.id, h.operator)
        .await
        .unwrap();
    assert_eq!(fetched.status, DocumentStatus::Issued);

    let active = h
        .state
        .document_service
        .find_all(None, ListFilter::Active)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    let archived = h
        .state
        .document_service
        .find_all(None, ListFilter::Archived)
        .await
        .unwrap();
    assert!(archived.is_empty());
    assert_eq!(
        h.state.document_service.search_global("asep").await.unwrap().len(),
        1
    );

    let expiring = h
        .state
        .dashboard_service
        .expiring_documents(h.operator, 3)
        .await
        .unwrap();
    assert!(expiring.is_empty());
}

#[tokio::test]
async fn timezone_reads_after_a_write_see_the_new_zone() {
    let h = harness(at(2026, 3, 1)).await;
    let cache = h.state.config_cache.clone();
    assert_eq!(cache.location().await.unwrap(), Tz::Asia__Jakarta);

    let readers: Vec<_> = (0..16)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.location_or_utc().await })
        })
        .collect();
    cache
        .save(&HashMap::from([(
            "timezone".to_string(),
            "Asia/Makassar".to_string(),
        )]))
        .await
        .unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    assert_eq!(cache.location().await.unwrap(), Tz::Asia__Makassar);
    assert_eq!(cache.get().await.unwrap().timezone, "Asia/Makassar");
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let h = harness(at(2026, 3, 1)).await;
    h.create("Asep").await;
    h.create("Dewi_Lestari").await;

    let documents = &h.state.document_service;
    assert!(documents.search_global("%").await.unwrap().is_empty());
    assert!(documents.search_global("As%p").await.unwrap().is_empty());
    assert!(documents.search_global("A_ep").await.unwrap().is_empty());

    let found = documents.search_global("i_l").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].resident.as_ref().unwrap().full_name, "Dewi_Lestari");
    assert_eq!(documents.search_global("SKH/0").await.unwrap().len(), 2);
}

#[tokio::test]
async fn existing_resident_is_reused_and_updated() {
    let start = at(2026, 9, 1);
    let h = harness(start).await;

    let first = h.create("Asep").await;
    let second = h.create("  Asep ").await;
    let other = h.create("Dewi").await;

    let first_resident = first.resident.unwrap();
    let second_resident = second.resident.unwrap();
    let other_resident = other.resident.unwrap();
    assert_eq!(first_resident.id, second_resident.id);

    // Placeholder ids come from the service clock and stay unique while it
    // stands still.
    let stamp = format!("TEMP{}-", start.timestamp());
    assert!(first_resident.national_id.starts_with(&stamp));
    assert!(other_resident.national_id.starts_with(&stamp));
    assert_ne!(first_resident.national_id, other_resident.national_id);

    let mut edited = input(h.operator, "Asep");
    edited.resident.address = "Jl. Riau 5".to_string();
    let updated = h
        .state
        .document_service
        .update(first.id, edited, h.operator)
        .await
        .unwrap();
    assert_eq!(updated.resident.unwrap().address, "Jl. Riau 5");
    assert_eq!(updated.last_updated_by.map(|u| u.id), Some(h.operator.value()));
}

#[tokio::test]
async fn failed_create_leaves_nothing_behind() {
    let h = harness(at(2026, 10, 1)).await;
    h.set("number_format", "STATIC").await;

    assert_eq!(h.create("Asep").await.document_number, "STATIC");

    let err = h
        .state
        .document_service
        .create(input(h.operator, "Dewi"), h.operator)
        .await
        .unwrap_err();
    assert!(
        matches!(err, DocumentError::Database(_) | DocumentError::Internal(_)),
        "{err:?}"
    );

    let resident = h
        .state
        .store
        .resident_repo()
        .find_by_identity("Dewi", "1990-04-12")
        .await
        .unwrap();
    assert!(resident.is_none());
}

#[tokio::test]
async fn operators_only_reach_their_own_letters() {
    let h = harness(at(2026, 10, 5)).await;
    let other = create_operator(&h.state, h.admin, "95110002").await;
    let doc = h.create("Asep").await;

    let err = h
        .state
        .document_service
        .find_by_id(doc.id, other)
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::AccessDenied));

    let err = h
        .state
        .document_service
        .delete(doc.id, other)
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::AccessDenied));

    h.state
        .document_service
        .find_by_id(doc.id, h.admin)
        .await
        .unwrap();

    let err = h
        .state
        .document_service
        .find_by_id(DocumentId::new(9999), h.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::NotFound(_)));
}

#[tokio::test]
async fn expiring_documents_follow_the_archive_window() {
    let start = at(2026, 4, 1);
    let h = harness(start).await;
    let other = create_operator(&h.state, h.admin, "95110003").await;
    let doc = h.create("Asep").await;

    h.clock.set(start + Duration::days(10));
    let soon = h
        .state
        .dashboard_service
        .expiring_documents(h.operator, 3)
        .await
        .unwrap();
    assert!(soon.is_empty());

    h.clock.set(start + Duration::days(13));
    let soon = h
        .state
        .dashboard_service
        .expiring_documents(h.operator, 3)
        .await
        .unwrap();
    assert_eq!(soon.len(), 1);
    assert_eq!(soon[0].document_number, doc.document_number);

    let theirs = h
        .state
        .dashboard_service
        .expiring_documents(other, 3)
        .await
        .unwrap();
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn dashboard_counts_use_local_calendar() {
    let h = harness(at(2026, 2, 10)).await;
    h.create("Asep").await;

    h.clock.set(at(2026, 3, 2));
    h.create("Dewi").await;
    h.create("Rudi").await;

    let stats = h.state.dashboard_service.stats().await.unwrap();
    assert_eq!(stats.docs_today, 2);
    assert_eq!(stats.docs_monthly, 2);
    assert_eq!(stats.docs_yearly, 3);
    assert_eq!(stats.active_users, 2);

    let chart = h.state.dashboard_service.monthly_issuance().await.unwrap();
    assert_eq!(chart.labels[1], "Feb");
    assert_eq!(chart.data[1], 1);
    assert_eq!(chart.data[2], 2);
}

#[tokio::test]
async fn audit_trail_is_written_in_order() {
    let h = harness(at(2026, 1, 20)).await;
    let doc = h.create("Asep").await;
    h.state
        .document_service
        .delete(doc.id, h.operator)
        .await
        .unwrap();

    h.state.audit.flush().await;
    let entries = h.state.audit.find_all().await.unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();

    assert_eq!(actions[0], "DELETE_DOCUMENT");
    assert!(entries[0].detail.contains(&doc.document_number));
    assert!(actions.contains(&"CREATE_DOCUMENT"));
    assert_eq!(h.state.audit.stats().dropped, 0);
}
