//! End-to-end submissions through the session against a mock service.

use loan_portal::client::HttpPredictor;
use loan_portal::config::ServiceConfig;
use loan_portal::domain::{ApplicationForm, Decision, Gender, PropertyArea, YesNo};
use loan_portal::session::{
    NoticeKind, ResultDisplay, ResultScreen, Session, SubmissionController, SubmissionError,
    SubmissionStatus, View,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Run {
    session: Session,
    status: SubmissionStatus,
    result: Result<Option<Decision>, SubmissionError>,
}

fn scenario_form() -> ApplicationForm {
    let mut form = ApplicationForm::default();
    form.married = YesNo::Yes;
    form.gender = Gender::Male;
    form.property_area = PropertyArea::Urban;
    form.applicant_income.set_raw("5000");
    form.loan_amount.set_raw("150");
    form
}

async fn submit_against(base_url: String, form: ApplicationForm) -> Run {
    tokio::task::spawn_blocking(move || {
        let config = ServiceConfig::resolve(Some(&base_url)).expect("config");
        let predictor = HttpPredictor::new(&config).expect("client");
        let mut session = Session::new(form);
        let mut controller = SubmissionController::new();
        let result = controller.submit(&mut session, &predictor);
        Run {
            session,
            status: controller.status(),
            result,
        }
    })
    .await
    .expect("blocking task")
}

async fn service_answering(status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({
            "married": 1,
            "education": 0,
            "gender": 1,
            "property_area": 1,
            "applicant_income": 5000.0,
            "credit_history": 1.0,
            "loan_amount": 150.0,
            "dependents": 0
        })))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn shown_display(session: &Session) -> Option<ResultDisplay> {
    match session.view() {
        View::Result(ResultScreen::Decided { display, .. }) => Some(*display),
        _ => None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_a_approved() {
    let server = service_answering(200, json!({"status": "Approved"})).await;
    let run = submit_against(server.uri(), scenario_form()).await;

    assert!(run.result.expect("submission").is_some());
    assert_eq!(run.status, SubmissionStatus::Idle);
    assert_eq!(shown_display(&run.session), Some(ResultDisplay::Approved));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_b_rejected() {
    let server = service_answering(200, json!({"status": "Rejected"})).await;
    let run = submit_against(server.uri(), scenario_form()).await;

    assert!(run.result.expect("submission").is_some());
    assert_eq!(shown_display(&run.session), Some(ResultDisplay::Rejected));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_c_invalid_income_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Approved"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = scenario_form();
    form.applicant_income.set_raw("abc");
    let run = submit_against(server.uri(), form).await;

    assert!(matches!(run.result, Err(SubmissionError::Validation(_))));
    assert_eq!(run.status, SubmissionStatus::Idle);
    assert_eq!(run.session.view(), &View::Form);
    assert!(run.session.decision().is_none());
    assert_eq!(run.session.notice().expect("notice").kind, NoticeKind::Validation);
    server.verify().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_d_unreachable_service_keeps_form() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut form = scenario_form();
    form.loan_amount.set_raw("175.25");
    let original = form.clone();
    let run = submit_against(format!("http://{addr}"), form).await;

    let err = run.result.unwrap_err();
    assert_eq!(err.notice_kind(), NoticeKind::Network);
    assert_eq!(run.session.view(), &View::Form);
    assert_eq!(run.session.form.loan_amount.raw(), original.loan_amount.raw());
    assert_eq!(run.session.form.applicant_income.raw(), original.applicant_income.raw());
    assert_eq!(run.session.notice().expect("notice").kind, NoticeKind::Network);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_e_service_detail_is_shown_verbatim() {
    let server = service_answering(503, json!({"detail": "model unavailable"})).await;
    let run = submit_against(server.uri(), scenario_form()).await;

    let err = run.result.unwrap_err();
    assert_eq!(err.notice_kind(), NoticeKind::Service);
    assert_eq!(err.notice_message(), "model unavailable");
    assert_eq!(run.session.notice().expect("notice").message, "model unavailable");
    assert_eq!(run.session.view(), &View::Form);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn returning_to_form_preserves_last_edit() {
    let server = service_answering(200, json!({"status": "Approved"})).await;
    let mut form = scenario_form();
    form.self_employed = YesNo::Yes;
    let run = submit_against(server.uri(), form.clone()).await;

    let mut session = run.session;
    session.back_to_form();
    assert_eq!(session.view(), &View::Form);
    assert_eq!(session.form.self_employed, YesNo::Yes);
    assert_eq!(session.form.applicant_income.raw(), "5000");
    assert!(session.decision().is_some());

    // Asking for the result again shows the stored decision.
    session.open_result();
    assert_eq!(shown_display(&session), Some(ResultDisplay::Approved));
}
