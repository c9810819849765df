use crate::api::attendance::{
    AttendanceListResponse, CreateAttendance, ScanRequest, ScanResponse, UpdateAttendance,
};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, UpdateEmployee};
use crate::api::faq::VoiceRequest;
use crate::api::visitor::LogVisitor;
use crate::model::attendance::{AttendanceRecord, ScanAction};
use crate::model::employee::Employee;
use crate::model::faq::{FaqEntry, NewFaq};
use crate::model::visitor::Visitor;
use crate::service::answer::{Answer, AnswerSource, TrainingOutcome};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Front Desk API",
        version = "1.0.0",
        description = r#"
## Office reception backend

- **Employees** – register staff and their RFID badges
- **Attendance** – badge scans toggle check-in / check-out; manual corrections
- **Visitors** – visitor log
- **FAQ** – answers questions from stored FAQs, a trained classifier, then an AI fallback

Answers carry a `source` of `Predefined`, `ML Prediction`, `AI Generated` or `Error`.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::scan,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::visitor::list_visitors,
        crate::api::visitor::log_visitor,

        crate::api::faq::list_faqs,
        crate::api::faq::add_faq,
        crate::api::faq::search,
        crate::api::faq::voice,
        crate::api::faq::retrain
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            UpdateEmployee,
            EmployeeListResponse,
            AttendanceRecord,
            AttendanceListResponse,
            CreateAttendance,
            UpdateAttendance,
            ScanRequest,
            ScanResponse,
            ScanAction,
            Visitor,
            LogVisitor,
            FaqEntry,
            NewFaq,
            VoiceRequest,
            Answer,
            AnswerSource,
            TrainingOutcome
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance and badge scan APIs"),
        (name = "Visitor", description = "Visitor log APIs"),
        (name = "FAQ", description = "Question answering APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_resolver_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/attendance/scan"));
        assert!(doc.paths.paths.contains_key("/api/faqs/search"));
        assert!(doc.paths.paths.contains_key("/api/faqs/voice"));
    }

    #[test]
    fn path_parameters_match_registered_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        for path in ["/api/attendance/{id}", "/api/employees/{id}"] {
            for method in ["get", "put", "delete"] {
                let param = &doc["paths"][path][method]["parameters"][0];
                assert_eq!(param["name"], "id", "{method} {path}");
                assert_eq!(param["in"], "path", "{method} {path}");
            }
        }
    }

    #[test]
    fn faq_responses_reference_their_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema_of = |path: &str, method: &str, status: &str| {
            doc["paths"][path][method]["responses"][status]["content"]["application/json"]
                ["schema"]
                .to_string()
        };

        assert!(schema_of("/api/faqs/search", "get", "200").contains("#/components/schemas/Answer"));
        assert!(
            schema_of("/api/faqs/retrain", "post", "200")
                .contains("#/components/schemas/TrainingOutcome")
        );
        assert!(schema_of("/api/faqs", "post", "201").contains("#/components/schemas/FaqEntry"));
        assert!(schema_of("/api/faqs", "get", "200").contains("#/components/schemas/FaqEntry"));
    }
}
