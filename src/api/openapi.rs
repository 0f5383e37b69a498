//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, dashboard, equipment, health, locations, requests, staff, workload};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "WardFlow API",
        version = "0.3.0",
        description = "Hospital Equipment Transport Dispatch REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "WardFlow Team")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Requests
        requests::list_requests,
        requests::active_requests,
        requests::my_requests,
        requests::assigned_requests,
        requests::get_request,
        requests::create_request,
        requests::update_request_status,
        requests::assign_request,
        requests::cancel_request,
        // Equipment
        equipment::list_equipment,
        equipment::nearby_equipment,
        equipment::search_equipment,
        equipment::get_equipment,
        equipment::update_equipment_status,
        // Workload
        workload::get_overview,
        workload::list_staff_workload,
        workload::get_staff_workload,
        // Staff
        staff::list_staff,
        staff::get_staff,
        staff::create_staff,
        // Directory
        locations::list_floors,
        locations::floor_equipment,
        locations::list_rooms,
        locations::search_rooms,
        locations::get_room,
        // Dashboard
        dashboard::get_dashboard,
        dashboard::get_my_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Requests
            crate::models::request::TransportRequest,
            crate::models::request::RequestDetails,
            requests::CreateRequestBody,
            requests::UpdateStatusBody,
            requests::AssignBody,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentRef,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::AssignedRequestSummary,
            equipment::UpdateEquipmentStatusBody,
            equipment::NearbyEquipmentResponse,
            // Staff
            crate::models::staff::Staff,
            crate::models::staff::StaffRef,
            crate::models::staff::CreateStaff,
            // Directory
            crate::models::location::Floor,
            crate::models::location::RoomRef,
            crate::models::location::RoomSummary,
            // Workload
            workload::WorkloadOverview,
            workload::StaffTaskCounts,
            workload::StaffWorkload,
            workload::StaffWorkloadDetail,
            // Dashboard
            dashboard::DashboardResponse,
            dashboard::NearbyEquipmentSummary,
            dashboard::MyStatsResponse,
            // Enums
            crate::models::enums::Priority,
            crate::models::enums::RequestStatus,
            crate::models::enums::EquipmentType,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::Role,
            crate::models::enums::StaffStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "requests", description = "Transport request dispatch"),
        (name = "equipment", description = "Equipment registry"),
        (name = "workload", description = "Workload analytics"),
        (name = "staff", description = "Staff directory"),
        (name = "directory", description = "Floors and rooms"),
        (name = "dashboard", description = "Per-user dashboard")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
