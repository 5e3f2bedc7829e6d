//! End-to-end tests against the full router on an in-memory database

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use hcdash_api::{ApiServer, ApiServerConfig};
use hcdash_auth::hash_password;
use hcdash_db::{
    entities::{company::CompanyType, user::UserRole},
    repository::{self, NewUser},
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot` method

const ADMIN_EMAIL: &str = "admin@holding.example";
const ADMIN_PASSWORD: &str = "AdminPassword123";

struct TestApp {
    router: Router,
    db: DatabaseConnection,
    holding_id: i32,
    alpha_id: i32,
    beta_id: i32,
}

async fn create_test_app() -> TestApp {
    let db = hcdash_db::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    hcdash_db::migrate(&db).await.expect("Failed to run migrations");

    let holding = repository::create_company(&db, "Holding", CompanyType::Holding)
        .await
        .unwrap();
    let alpha = repository::create_company(&db, "PT Alpha", CompanyType::Anper)
        .await
        .unwrap();
    let beta = repository::create_company(&db, "PT Beta", CompanyType::Anper)
        .await
        .unwrap();

    repository::create_user(
        &db,
        NewUser {
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
            full_name: Some("Admin".to_string()),
            role: UserRole::SuperAdmin,
            company_id: holding.id,
        },
    )
    .await
    .unwrap();

    let config = ApiServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        jwt_secret: "test-secret".to_string(),
        ..Default::default()
    };

    TestApp {
        router: ApiServer::new(config, db.clone()).build_router(),
        db,
        holding_id: holding.id,
        alpha_id: alpha.id,
        beta_id: beta.id,
    }
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

/// `session_token=...` pair from a `Set-Cookie` header
fn session_pair(headers: &HeaderMap) -> String {
    let cookie = headers
        .get(header::SET_COOKIE)
        .expect("No Set-Cookie header")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let (status, headers, _) = send(
        app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    session_pair(&headers)
}

async fn signup(app: &TestApp, email: &str, company_id: i32) -> String {
    let (status, headers, body) = send(
        app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": email,
                "password": "UserPassword123",
                "fullName": "HR Officer",
                "companyId": company_id
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    session_pair(&headers)
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;

    let (status, _, body) = send(&app, request("GET", "/api/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_signup_sets_session_cookie() {
    let app = create_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "HR@Alpha.example",
                "password": "UserPassword123",
                "companyId": app.alpha_id
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));

    let session = cookie.split(';').next().unwrap().to_string();
    let (status, _, me) = send(&app, request("GET", "/api/auth/me", Some(&session), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "hr@alpha.example");
    assert_eq!(me["role"], "USER");
    assert_eq!(me["companyId"], app.alpha_id);
}

#[tokio::test]
async fn test_signup_without_full_name() {
    let app = create_test_app().await;

    let (status, headers, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "hr@beta.example",
                "password": "Password123",
                "companyId": app.beta_id
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    assert_eq!(body["user"]["fullName"], Value::Null);

    let session = session_pair(&headers);
    let (status, _, me) = send(&app, request("GET", "/api/auth/me", Some(&session), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["fullName"], Value::Null);
    assert_eq!(me["companyId"], app.beta_id);
}

#[tokio::test]
async fn test_signup_rejects_weak_password_and_duplicates() {
    let app = create_test_app().await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"email": "hr@alpha.example", "password": "short", "companyId": app.alpha_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");

    signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"email": "hr@alpha.example", "password": "UserPassword123", "companyId": app.alpha_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = create_test_app().await;

    let (status, headers, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": ADMIN_EMAIL, "password": "not-the-password"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = create_test_app().await;

    for uri in [
        "/api/auth/me",
        "/api/companies",
        "/api/charts/headcount?type=monthly&value=1&year=2024",
        "/api/admin/companies",
    ] {
        let (status, _, _) = send(&app, request("GET", uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let (status, _, _) = send(
        &app,
        request("GET", "/api/companies", Some("session_token=garbage"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = create_test_app().await;

    let (status, headers, _) = send(&app, request("POST", "/api/auth/logout", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_metric_upsert_overwrites_same_period() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    for (male, female) in [(json!(10), json!(5)), (json!("12"), json!("7"))] {
        let (status, _, body) = send(
            &app,
            request(
                "POST",
                "/api/input/headcount",
                Some(&session),
                Some(json!({"year": 2024, "month": 3, "male": male, "female": female})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    let (status, _, record) = send(
        &app,
        request(
            "GET",
            "/api/data-center/headcount?year=2024&month=3",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["male"], 12);
    assert_eq!(record["female"], 7);

    let (_, _, chart) = send(
        &app,
        request(
            "GET",
            "/api/charts/headcount?type=quarterly&value=1&year=2024",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(chart["hasData"], true);
    assert_eq!(chart["totals"]["total"], 19.0);
    assert_eq!(chart["labels"], json!(["Jan", "Feb", "Mar"]));
}

#[tokio::test]
async fn test_data_center_read_of_missing_period_is_null() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, record) = send(
        &app,
        request(
            "GET",
            "/api/data-center/hcma-score?year=2024",
            Some(&session),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record, Value::Null);
}

#[tokio::test]
async fn test_invalid_fields_are_listed() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/input/headcount",
            Some(&session),
            Some(json!({"year": 2024, "month": 13, "male": "abc", "female": 3})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FIELDS");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"month"));
    assert!(fields.contains(&"male"));
    assert!(!fields.contains(&"female"));
}

#[tokio::test]
async fn test_unknown_metric_is_not_found() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/input/payroll",
            Some(&session),
            Some(json!({"year": 2024, "month": 1})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_is_confined_to_own_company() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, companies) = send(
        &app,
        request("GET", "/api/companies?companyId=999", Some(&session), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(companies, json!([{"id": app.alpha_id, "name": "PT Alpha"}]));

    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/input/headcount",
            Some(&session),
            Some(json!({"year": 2024, "month": 1, "companyId": app.beta_id, "male": 1, "female": 1})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_super_admin_sees_all_and_must_name_write_company() {
    let app = create_test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, _, companies) = send(&app, request("GET", "/api/companies", Some(&session), None)).await;
    assert_eq!(companies.as_array().unwrap().len(), 3);

    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/input/engagement",
            Some(&session),
            Some(json!({"year": 2024, "month": 1, "score": 80, "respondents": 10})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for (company_id, score, respondents) in [(app.alpha_id, 80, 30), (app.beta_id, 60, 10)] {
        let (status, _, _) = send(
            &app,
            request(
                "POST",
                "/api/input/engagement",
                Some(&session),
                Some(json!({
                    "year": 2024,
                    "month": 1,
                    "companyId": company_id,
                    "score": score,
                    "respondents": respondents
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, _, chart) = send(
        &app,
        request(
            "GET",
            "/api/charts/engagement?type=monthly&value=1&year=2024",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(chart["totals"]["score"], 75.0);
    assert_eq!(chart["bands"]["score"], "Good");

    let uri = format!(
        "/api/charts/engagement?type=monthly&value=1&year=2024&companyId={}",
        app.beta_id
    );
    let (_, _, chart) = send(&app, request("GET", &uri, Some(&session), None)).await;
    assert_eq!(chart["totals"]["score"], 60.0);
}

#[tokio::test]
async fn test_headcount_totals_sum_each_company_latest_month() {
    let app = create_test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for (company_id, month, male, female) in [(app.alpha_id, 4, 100, 50), (app.beta_id, 5, 10, 5)] {
        let (status, _, body) = send(
            &app,
            request(
                "POST",
                "/api/input/headcount",
                Some(&session),
                Some(json!({
                    "year": 2024,
                    "month": month,
                    "companyId": company_id,
                    "male": male,
                    "female": female
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    let (status, _, chart) = send(
        &app,
        request(
            "GET",
            "/api/charts/headcount?type=quarterly&value=2&year=2024",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["totals"]["male"], 110.0);
    assert_eq!(chart["totals"]["female"], 55.0);
    assert_eq!(chart["totals"]["total"], 165.0);
}

#[tokio::test]
async fn test_company_id_query_is_percent_decoded() {
    let app = create_test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let uri = format!("/api/companies?companyId=%{:X}", b'0' + app.alpha_id as u8);
    let (status, _, companies) = send(&app, request("GET", &uri, Some(&session), None)).await;
    assert_eq!(status, StatusCode::OK, "{}", companies);
    assert_eq!(companies, json!([{"id": app.alpha_id, "name": "PT Alpha"}]));

    let (status, _, companies) = send(
        &app,
        request("GET", "/api/companies?companyId=%61ll", Some(&session), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(companies.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_monthly_chart_has_zero_shape() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, chart) = send(
        &app,
        request(
            "GET",
            "/api/charts/turnover?type=quarterly&value=2&year=2030",
            Some(&session),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["hasData"], false);
    assert_eq!(chart["series"][0]["values"], json!([0.0, 0.0, 0.0]));
    assert_eq!(chart["derived"]["turnoverRate"], Value::Null);
}

#[tokio::test]
async fn test_chart_rejects_bad_period() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, _) = send(
        &app,
        request(
            "GET",
            "/api/charts/headcount?type=weekly&value=1&year=2024",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        request("GET", "/api/charts/payroll?type=yearly&year=2024", Some(&session), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scores_chart_is_not_found_without_data() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, _) = send(
        &app,
        request("GET", "/api/charts/scores?year=2024", Some(&session), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        request(
            "POST",
            "/api/input/hcma-score",
            Some(&session),
            Some(json!({"year": 2024, "score": "3.5"})),
        ),
    )
    .await;

    let (status, _, scores) = send(
        &app,
        request("GET", "/api/charts/scores?year=2024", Some(&session), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scores["hcma"]["score"], 3.5);
    assert_eq!(scores["hcma"]["band"], "Excellence");
    assert_eq!(scores["orgHealth"], Value::Null);
}

#[tokio::test]
async fn test_kpi_achievement_is_capped() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, kpi) = send(
        &app,
        request(
            "POST",
            "/api/input/kpi",
            Some(&session),
            Some(json!({
                "year": 2024,
                "quarter": 2,
                "name": "Revenue growth",
                "weight": 0.5,
                "achievementScore": 1.5
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", kpi);
    assert_eq!(kpi["achievementScore"], 1.5);

    let (status, _, chart) = send(
        &app,
        request("GET", "/api/charts/kpi?year=2024", Some(&session), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let score = chart["quarters"][0]["score"].as_f64().unwrap();
    assert!((score - 55.0).abs() < 1e-9);
    assert_eq!(chart["quarters"][0]["band"], "Low");

    let (status, _, _) = send(
        &app,
        request(
            "GET",
            "/api/charts/kpi?year=2024&type=quarterly&value=3",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workforce_is_all_or_nothing() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let mut body = json!({
        "year": 2024,
        "month": 6,
        "headcount": {"male": 6, "female": 4},
        "employeeStatus": {"permanent": 8, "contract": 2},
        "education": {"highSchool": 1, "diploma": 2, "bachelor": 5, "master": 2, "doctorate": 0},
        "ageGroup": {"under_25": 1, "age_25_34": 4, "age_35_44": 3, "age_45_54": 1, "over_55": "x"}
    });

    let (status, _, _) = send(
        &app,
        request("POST", "/api/input/workforce", Some(&session), Some(body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, record) = send(
        &app,
        request(
            "GET",
            "/api/data-center/headcount?year=2024&month=6",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(record, Value::Null);

    body["ageGroup"]["over_55"] = json!(1);
    let (status, _, _) = send(
        &app,
        request("POST", "/api/input/workforce", Some(&session), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, chart) = send(
        &app,
        request(
            "GET",
            "/api/charts/age?type=monthly&value=6&year=2024",
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(chart["totals"]["total"], 10.0);
}

#[tokio::test]
async fn test_admin_routes_require_super_admin() {
    let app = create_test_app().await;
    let session = signup(&app, "hr@alpha.example", app.alpha_id).await;

    let (status, _, body) = send(
        &app,
        request("GET", "/api/admin/companies", Some(&session), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_non_integer_id_is_json_error() {
    let app = create_test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, headers, body) = send(
        &app,
        request(
            "PUT",
            "/api/admin/companies/abc",
            Some(&session),
            Some(json!({"name": "PT Gamma", "type": "Anper"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body["code"], "VALIDATION");

    let (status, _, body) = send(
        &app,
        request("DELETE", "/api/admin/companies/abc", Some(&session), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
}

#[tokio::test]
async fn test_admin_company_lifecycle() {
    let app = create_test_app().await;
    signup(&app, "hr@alpha.example", app.alpha_id).await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _, created) = send(
        &app,
        request(
            "POST",
            "/api/admin/companies",
            Some(&session),
            Some(json!({"name": "PT Gamma", "type": "Anper"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let gamma_id = created["id"].as_i64().unwrap();

    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/admin/companies",
            Some(&session),
            Some(json!({"name": "PT Gamma", "type": "Anper"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, renamed) = send(
        &app,
        request(
            "PUT",
            &format!("/api/admin/companies/{}", gamma_id),
            Some(&session),
            Some(json!({"name": "PT Gamma Baru", "type": "Anper"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "PT Gamma Baru");

    let (status, _, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/admin/companies/{}", app.alpha_id),
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/admin/companies/{}", gamma_id),
            Some(&session),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let remaining = repository::list_companies(&app.db, hcdash_db::CompanyScope::All)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().any(|c| c.id == app.holding_id));
}

#[tokio::test]
async fn test_pages_redirect_to_login() {
    let app = create_test_app().await;

    let (status, headers, _) = send(&app, request("GET", "/dashboard", None, None)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/login");

    let (status, _, _) = send(&app, request("GET", "/login", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, _, _) = send(&app, request("GET", "/dashboard", Some(&session), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
