//! Integration tests for the guest, companion and project repositories.
//!
//! Exercises the repository layer against a real database:
//! - Guest creation persists the submitted companions
//! - Cascade delete of companions and project children
//! - Bulk RSVP updates guest and companions together
//! - Companion diff keeps resubmitted ids
//! - CSV import reports bad rows and keeps going

use assert_matches::assert_matches;
use sprezzia_core::guest_csv::parse_guest_csv;
use sprezzia_core::status::{GuestStatus, MessageStatus};
use sprezzia_db::models::guest::{CompanionInput, CreateGuest};
use sprezzia_db::models::project::CreateProject;
use sprezzia_db::repositories::guest_repo::GuestOrder;
use sprezzia_db::repositories::{CompanionRepo, GuestRepo, ProjectRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_project(pool: &PgPool, owner: &str) -> i64 {
    let input = CreateProject {
        name: "Casamento Ana & Bruno".to_string(),
        description: None,
        event_date: None,
        event_type: Some("wedding".to_string()),
        budget: None,
        workspace_id: None,
        status: None,
    };
    ProjectRepo::create(pool, owner, &input).await.unwrap().id
}

fn companion(name: &str) -> CompanionInput {
    CompanionInput {
        id: None,
        name: name.to_string(),
        status: None,
    }
}

fn new_guest(name: &str, phone: Option<&str>, companions: Vec<CompanionInput>) -> CreateGuest {
    CreateGuest {
        name: name.to_string(),
        phone: phone.map(str::to_string),
        status: None,
        children_0_6: 0,
        children_7_10: 0,
        observations: None,
        companions,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_persists_exact_companion_list(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let input = new_guest("Ana", Some("11987654321"), vec![companion("Bruno"), companion("Carla")]);

    let created = GuestRepo::create_with_companions(&pool, project_id, &input)
        .await
        .unwrap();
    assert_eq!(created.guest.status, GuestStatus::Pendente);
    assert_eq!(created.guest.message_status, MessageStatus::NaoEnviada);

    let loaded = GuestRepo::find_with_companions(&pool, project_id, created.guest.id)
        .await
        .unwrap()
        .unwrap();
    let names: Vec<&str> = loaded.companions.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Bruno", "Carla"]);
    assert!(loaded
        .companions
        .iter()
        .all(|c| c.status == GuestStatus::Pendente));
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_guest_removes_companions(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let created = GuestRepo::create_with_companions(
        &pool,
        project_id,
        &new_guest("Ana", None, vec![companion("Bruno")]),
    )
    .await
    .unwrap();

    assert!(GuestRepo::delete(&pool, project_id, created.guest.id).await.unwrap());
    let remaining = CompanionRepo::list_by_guest(&pool, created.guest.id).await.unwrap();
    assert!(remaining.is_empty());
    assert!(!GuestRepo::delete(&pool, project_id, created.guest.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_project_cascades(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let created = GuestRepo::create_with_companions(
        &pool,
        project_id,
        &new_guest("Ana", None, vec![companion("Bruno")]),
    )
    .await
    .unwrap();

    assert!(ProjectRepo::delete(&pool, project_id).await.unwrap());
    let (guests,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guests WHERE id = $1")
        .bind(created.guest.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let (companions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companions WHERE guest_id = $1")
        .bind(created.guest.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((guests, companions), (0, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_confirm_updates_guest_and_companions(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let created = GuestRepo::create_with_companions(
        &pool,
        project_id,
        &new_guest("Ana", None, vec![companion("Bruno"), companion("Carla")]),
    )
    .await
    .unwrap();

    let updated = GuestRepo::apply_bulk_status(
        &pool,
        project_id,
        created.guest.id,
        GuestStatus::ConfirmadoPresenca,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.guest.status, GuestStatus::ConfirmadoPresenca);
    assert_eq!(updated.companions.len(), 2);
    assert!(updated
        .companions
        .iter()
        .all(|c| c.status == GuestStatus::ConfirmadoPresenca));
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_status_on_other_project_is_none(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let other_project = new_project(&pool, "user_1").await;
    let created = GuestRepo::create_with_companions(&pool, project_id, &new_guest("Ana", None, vec![]))
        .await
        .unwrap();

    let result = GuestRepo::apply_bulk_status(
        &pool,
        other_project,
        created.guest.id,
        GuestStatus::ConfirmadoAusencia,
    )
    .await
    .unwrap();
    assert_matches!(result, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn replace_diffs_companions(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let created = GuestRepo::create_with_companions(
        &pool,
        project_id,
        &new_guest("Ana", None, vec![companion("Bruno"), companion("Carla")]),
    )
    .await
    .unwrap();
    let bruno = created.companions[0].id;

    let mut input = new_guest(
        "Ana Souza",
        Some("11999990000"),
        vec![
            CompanionInput {
                id: Some(bruno),
                name: "Bruno Lima".to_string(),
                status: Some(GuestStatus::ConfirmadoPresenca),
            },
            companion("Diego"),
        ],
    );
    input.children_0_6 = 2;

    let replaced = GuestRepo::replace(&pool, project_id, created.guest.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.guest.name, "Ana Souza");
    assert_eq!(replaced.guest.children_0_6, 2);

    let stored = CompanionRepo::list_by_guest(&pool, created.guest.id).await.unwrap();
    let names: Vec<&str> = stored.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Bruno Lima", "Diego"]);
    assert_eq!(stored[0].id, bruno);
    assert_eq!(stored[0].status, GuestStatus::ConfirmadoPresenca);
}

#[sqlx::test(migrations = "./migrations")]
async fn replace_with_foreign_companion_id_inserts(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let first = GuestRepo::create_with_companions(&pool, project_id, &new_guest("Ana", None, vec![companion("Bruno")]))
        .await
        .unwrap();
    let second = GuestRepo::create_with_companions(&pool, project_id, &new_guest("Eva", None, vec![]))
        .await
        .unwrap();

    let input = new_guest(
        "Eva",
        None,
        vec![CompanionInput {
            id: Some(first.companions[0].id),
            name: "Fabio".to_string(),
            status: None,
        }],
    );
    let replaced = GuestRepo::replace(&pool, project_id, second.guest.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(replaced.companions[0].id, first.companions[0].id);

    // The other guest's companion is untouched.
    let untouched = CompanionRepo::list_by_guest(&pool, first.guest.id).await.unwrap();
    assert_eq!(untouched[0].name, "Bruno");
}

#[sqlx::test(migrations = "./migrations")]
async fn broadcast_selection_filters_phone_and_status(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let pending = GuestRepo::create_with_companions(&pool, project_id, &new_guest("Ana", Some("11911112222"), vec![]))
        .await
        .unwrap();
    let confirmed = GuestRepo::create_with_companions(&pool, project_id, &new_guest("Bia", Some("11933334444"), vec![]))
        .await
        .unwrap();
    GuestRepo::create_with_companions(&pool, project_id, &new_guest("Caio", None, vec![]))
        .await
        .unwrap();
    GuestRepo::set_status(&pool, project_id, confirmed.guest.id, GuestStatus::ConfirmadoPresenca)
        .await
        .unwrap();

    let all = GuestRepo::list_for_broadcast(&pool, project_id, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_pending = GuestRepo::list_for_broadcast(&pool, project_id, Some(GuestStatus::Pendente))
        .await
        .unwrap();
    assert_eq!(only_pending.len(), 1);
    assert_eq!(only_pending[0].guest.id, pending.guest.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn import_reports_invalid_rows(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let csv = "nome,telefone,status,acompanhantes,status_acompanhantes,criancas_0_6,criancas_7_10\n\
               Ana,11987654321,CONFIRMADO_PRESENCA,Bruno;Carla,CONFIRMADO_PRESENCA,1,0\n\
               ,11900000000,PENDENTE,,,0,0\n\
               Diego,,,,,-1,0\n\
               Eva,,,,,,\n";
    let parsed = parse_guest_csv(csv.as_bytes()).unwrap();

    let report = GuestRepo::import_rows(&pool, project_id, parsed).await;
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 2);
    let lines: Vec<usize> = report.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, [3, 4]);

    let guests = GuestRepo::list_with_companions(&pool, project_id, GuestOrder::Name)
        .await
        .unwrap();
    assert_eq!(guests.len(), 2);
    assert_eq!(guests[0].guest.name, "Ana");
    assert_eq!(guests[0].guest.children_0_6, 1);
    assert_eq!(guests[0].companions.len(), 2);
    assert_eq!(guests[0].companions[0].status, GuestStatus::ConfirmadoPresenca);
    assert_eq!(guests[0].companions[1].status, GuestStatus::Pendente);
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_count_people(pool: PgPool) {
    let project_id = new_project(&pool, "user_1").await;
    let ana = GuestRepo::create_with_companions(&pool, project_id, &new_guest("Ana", Some("1"), vec![companion("Bruno")]))
        .await
        .unwrap();
    GuestRepo::create_with_companions(&pool, project_id, &new_guest("Caio", None, vec![]))
        .await
        .unwrap();
    GuestRepo::apply_bulk_status(&pool, project_id, ana.guest.id, GuestStatus::ConfirmadoPresenca)
        .await
        .unwrap();
    GuestRepo::set_message_status(&pool, ana.guest.id, MessageStatus::Enviada)
        .await
        .unwrap();

    let stats = GuestRepo::stats(&pool, project_id).await.unwrap();
    assert_eq!(stats.guests, 2);
    assert_eq!(stats.companions, 1);
    assert_eq!(stats.total_people, 3);
    assert_eq!(stats.confirmed, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.messages_sent, 1);
    assert_eq!(stats.messages_not_sent, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn project_stats_count_active(pool: PgPool) {
    let first = new_project(&pool, "user_1").await;
    new_project(&pool, "user_1").await;
    new_project(&pool, "user_2").await;

    let update = sprezzia_db::models::project::UpdateProject {
        status: Some(sprezzia_core::status::ProjectStatus::Completed),
        ..Default::default()
    };
    ProjectRepo::update(&pool, first, &update).await.unwrap();

    let stats = ProjectRepo::stats_by_owner(&pool, "user_1").await.unwrap();
    assert_eq!(stats.total_projects, 2);
    assert_eq!(stats.active_projects, 1);
}
