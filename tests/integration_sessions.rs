mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    TestUser, create_test_help_type, create_test_request, create_test_user, generate_unique_email,
    generate_unique_name,
};
use http_body_util::BodyExt;
use mentorhub::config::cors::CorsConfig;
use mentorhub::config::email::EmailConfig;
use mentorhub::config::jwt::JwtConfig;
use mentorhub::modules::users::model::UserRole;
use mentorhub::router::init_router;
use mentorhub::state::AppState;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn login(pool: &PgPool, user: &TestUser) -> String {
    let app = setup_test_app(pool.clone()).await;
    get_auth_token(app, &user.email, &user.password).await
}

/// Student, mentor, and a request already accepted by that mentor.
struct SessionFixture {
    student: TestUser,
    mentor: TestUser,
    request_id: Uuid,
}

async fn setup_accepted_request(pool: &PgPool) -> SessionFixture {
    let mut tx = pool.begin().await.unwrap();
    let student =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Student).await;
    let mentor =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Mentor).await;
    let help_type_id = create_test_help_type(&mut tx, &generate_unique_name("Help")).await;
    let request_id = create_test_request(&mut tx, student.id, help_type_id, "Session host").await;
    tx.commit().await.unwrap();

    sqlx::query(
        "UPDATE mentorship_requests SET mentor_id = $1, status = 'accepted_by_mentor' WHERE id = $2",
    )
    .bind(mentor.id)
    .bind(request_id)
    .execute(pool)
    .await
    .unwrap();

    SessionFixture {
        student,
        mentor,
        request_id,
    }
}

fn slot(start: &str, end: &str) -> serde_json::Value {
    json!({ "startTime": start, "endTime": end })
}

async fn post_session(
    pool: &PgPool,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/sessions")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, body)
}

async fn put_session(
    pool: &PgPool,
    token: &str,
    session_id: Uuid,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/sessions/{}", session_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// Create a session proposed by the student and return its id.
async fn propose_session(pool: &PgPool, fixture: &SessionFixture) -> Uuid {
    let token = login(pool, &fixture.student).await;
    let (status, body) = post_session(
        pool,
        &token,
        json!({
            "mentorshipRequestId": fixture.request_id,
            "proposedDateTimes": [
                slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z"),
                slot("2026-09-02T14:00:00Z", "2026-09-02T15:00:00Z")
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(body["session"]["id"].as_str().unwrap()).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_can_propose_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let token = login(&pool, &fixture.student).await;

    let (status, body) = post_session(
        &pool,
        &token,
        json!({
            "mentorshipRequestId": fixture.request_id,
            "proposedDateTimes": [slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")],
            "locationOrLink": "https://meet.example.com/abc"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let session = &body["session"];
    assert_eq!(session["status"], "proposed");
    assert_eq!(session["proposedBy"]["id"], fixture.student.id.to_string());
    assert_eq!(session["mentor"]["id"], fixture.mentor.id.to_string());
    assert_eq!(session["student"]["id"], fixture.student.id.to_string());
    assert_eq!(session["locationOrLink"], "https://meet.example.com/abc");
    assert_eq!(session["proposedDateTimes"].as_array().unwrap().len(), 1);
    assert!(session["confirmedDateTime"].is_null());
    assert_eq!(
        session["mentorshipRequest"]["id"],
        fixture.request_id.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mentor_can_propose_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let token = login(&pool, &fixture.mentor).await;

    let (status, body) = post_session(
        &pool,
        &token,
        json!({
            "mentorshipRequestId": fixture.request_id,
            "proposedDateTimes": [slot("2026-09-03T09:00:00Z", "2026-09-03T10:00:00Z")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["session"]["proposedBy"]["id"],
        fixture.mentor.id.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_propose_session_on_pending_request(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let student =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Student).await;
    let help_type_id = create_test_help_type(&mut tx, &generate_unique_name("Help")).await;
    let request_id = create_test_request(&mut tx, student.id, help_type_id, "Still pending").await;
    tx.commit().await.unwrap();

    let token = login(&pool, &student).await;
    let (status, _) = post_session(
        &pool,
        &token,
        json!({
            "mentorshipRequestId": request_id,
            "proposedDateTimes": [slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_propose_session_without_assigned_mentor(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let student =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Student).await;
    let help_type_id = create_test_help_type(&mut tx, &generate_unique_name("Help")).await;
    let request_id = create_test_request(&mut tx, student.id, help_type_id, "Unassigned").await;
    tx.commit().await.unwrap();

    // Admin-forced in_progress without a mentor on record
    sqlx::query("UPDATE mentorship_requests SET status = 'in_progress' WHERE id = $1")
        .bind(request_id)
        .execute(&pool)
        .await
        .unwrap();

    let token = login(&pool, &student).await;
    let (status, _) = post_session(
        &pool,
        &token,
        json!({
            "mentorshipRequestId": request_id,
            "proposedDateTimes": [slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_propose_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let admin =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Admin).await;
    tx.commit().await.unwrap();

    let token = login(&pool, &admin).await;
    let (status, _) = post_session(
        &pool,
        &token,
        json!({
            "mentorshipRequestId": fixture.request_id,
            "proposedDateTimes": [slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_propose_session_requires_slots(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let token = login(&pool, &fixture.student).await;

    let (status, _) = post_session(
        &pool,
        &token,
        json!({
            "mentorshipRequestId": fixture.request_id,
            "proposedDateTimes": []
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_propose_session_rejects_inverted_slot(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let token = login(&pool, &fixture.student).await;

    let (status, _) = post_session(
        &pool,
        &token,
        json!({
            "mentorshipRequestId": fixture.request_id,
            "proposedDateTimes": [slot("2026-09-01T11:00:00Z", "2026-09-01T10:00:00Z")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mentor_can_confirm_student_proposal(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.mentor).await;
    let (status, body) = put_session(
        &pool,
        &token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let session = &body["session"];
    assert_eq!(session["status"], "confirmed");
    assert_eq!(
        session["confirmedDateTime"]["startTime"],
        "2026-09-01T10:00:00Z"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_proposer_cannot_confirm_own_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.student).await;
    let (status, _) = put_session(
        &pool,
        &token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_confirm_requires_matching_slot(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.mentor).await;
    let (status, _) = put_session(
        &pool,
        &token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-05T10:00:00Z", "2026-09-05T11:00:00Z")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_confirm_is_single_shot(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.mentor).await;
    let confirm = json!({
        "status": "confirmed",
        "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
    });

    let (status, _) = put_session(&pool, &token, session_id, confirm.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = put_session(&pool, &token, session_id, confirm).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mentor_can_mark_confirmed_session_held(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mentor_token = login(&pool, &fixture.mentor).await;
    let (status, _) = put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "held",
            "summaryMentor": "Covered chapter structure and next steps."
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["status"], "held");
    assert_eq!(
        body["session"]["summaryMentor"],
        "Covered chapter structure and next steps."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_mark_unconfirmed_session_held(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.mentor).await;
    let (status, _) = put_session(&pool, &token, session_id, json!({ "status": "held" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_can_leave_feedback_on_held_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mentor_token = login(&pool, &fixture.mentor).await;
    put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;
    put_session(&pool, &mentor_token, session_id, json!({ "status": "held" })).await;

    let student_token = login(&pool, &fixture.student).await;
    let (status, body) = put_session(
        &pool,
        &student_token,
        session_id,
        json!({ "feedbackStudent": "Really useful, thanks!" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["feedbackStudent"], "Really useful, thanks!");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_leave_feedback_before_session_held(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.student).await;
    let (status, _) = put_session(
        &pool,
        &token,
        session_id,
        json!({ "feedbackStudent": "Jumping the gun" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_edit_location(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.student).await;
    let (status, _) = put_session(
        &pool,
        &token,
        session_id,
        json!({ "locationOrLink": "https://my-own-server.example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mentor_can_update_location_any_time(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.mentor).await;
    let (status, body) = put_session(
        &pool,
        &token,
        session_id,
        json!({ "locationOrLink": "Room 204, Engineering Building" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["session"]["locationOrLink"],
        "Room 204, Engineering Building"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mentor_can_cancel_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let token = login(&pool, &fixture.mentor).await;
    let (status, body) = put_session(
        &pool,
        &token,
        session_id,
        json!({ "status": "cancelled_by_mentor" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["status"], "cancelled_by_mentor");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_cancel_held_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mentor_token = login(&pool, &fixture.mentor).await;
    put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;
    put_session(&pool, &mentor_token, session_id, json!({ "status": "held" })).await;

    let (status, _) = put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({ "status": "cancelled_by_mentor" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mentor_reschedule_after_student_cancel(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mentor_token = login(&pool, &fixture.mentor).await;
    put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;

    let student_token = login(&pool, &fixture.student).await;
    let (status, _) = put_session(
        &pool,
        &student_token,
        session_id,
        json!({ "status": "cancelled_by_student" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "reschedule_requested_by_mentor",
            "proposedDateTimes": [slot("2026-09-10T10:00:00Z", "2026-09-10T11:00:00Z")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let session = &body["session"];
    assert_eq!(session["status"], "reschedule_requested_by_mentor");
    // Fresh proposal replaces the old one and invalidates the confirmed slot
    assert_eq!(session["proposedDateTimes"].as_array().unwrap().len(), 1);
    assert_eq!(
        session["proposedDateTimes"][0]["startTime"],
        "2026-09-10T10:00:00Z"
    );
    assert!(session["confirmedDateTime"].is_null());
    assert_eq!(session["proposedBy"]["id"], fixture.mentor.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reschedule_requires_fresh_slots(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mentor_token = login(&pool, &fixture.mentor).await;
    put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;

    let (status, _) = put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({ "status": "reschedule_requested_by_mentor" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_reschedule_after_mentor_cancel(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mentor_token = login(&pool, &fixture.mentor).await;
    put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({
            "status": "confirmed",
            "confirmedDateTime": slot("2026-09-01T10:00:00Z", "2026-09-01T11:00:00Z")
        }),
    )
    .await;
    put_session(
        &pool,
        &mentor_token,
        session_id,
        json!({ "status": "cancelled_by_mentor" }),
    )
    .await;

    let student_token = login(&pool, &fixture.student).await;
    let (status, body) = put_session(
        &pool,
        &student_token,
        session_id,
        json!({
            "status": "reschedule_requested_by_student",
            "proposedDateTimes": [slot("2026-09-12T16:00:00Z", "2026-09-12T17:00:00Z")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["status"], "reschedule_requested_by_student");
    assert_eq!(
        body["session"]["proposedBy"]["id"],
        fixture.student.id.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_can_force_session_status(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mut tx = pool.begin().await.unwrap();
    let admin =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Admin).await;
    tx.commit().await.unwrap();

    let token = login(&pool, &admin).await;
    let (status, body) = put_session(
        &pool,
        &token,
        session_id,
        json!({
            "status": "cancelled_by_mentor",
            "locationOrLink": "Moved by admin"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["status"], "cancelled_by_mentor");
    assert_eq!(body["session"]["locationOrLink"], "Moved by admin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_outsider_cannot_update_session(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    let session_id = propose_session(&pool, &fixture).await;

    let mut tx = pool.begin().await.unwrap();
    let outsider =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Student).await;
    tx.commit().await.unwrap();

    let token = login(&pool, &outsider).await;
    let (status, _) = put_session(
        &pool,
        &token,
        session_id,
        json!({ "status": "cancelled_by_student" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_participants_can_list_request_sessions(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    propose_session(&pool, &fixture).await;

    for user in [&fixture.student, &fixture.mentor] {
        let token = login(&pool, user).await;

        let app = setup_test_app(pool.clone()).await;
        let request = Request::builder()
            .method("GET")
            .uri(format!("/api/sessions/request/{}", fixture.request_id))
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_outsider_cannot_list_request_sessions(pool: PgPool) {
    let fixture = setup_accepted_request(&pool).await;
    propose_session(&pool, &fixture).await;

    let mut tx = pool.begin().await.unwrap();
    let outsider =
        create_test_user(&mut tx, &generate_unique_email(), "testpass123", UserRole::Student).await;
    tx.commit().await.unwrap();

    let token = login(&pool, &outsider).await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/sessions/request/{}", fixture.request_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
