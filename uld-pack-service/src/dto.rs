//! JSON request/response shapes for the HTTP layer (§6), grounded in
//! `python_server/solution.py` and `server/metrics_handler.py`. These are
//! adapter types only; the core crate never sees them directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackageDto {
    pub id: String,
    pub length: i64,
    pub width: i64,
    pub height: i64,
    pub weight: i64,
    pub priority: bool,
    /// `None` is the CSV's `-` sentinel: the package must be placed.
    #[serde(default)]
    pub cost: Option<i64>,
    #[serde(default)]
    pub fragile: bool,
    #[serde(default)]
    pub heavy: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UldDto {
    pub id: String,
    pub length: i64,
    pub width: i64,
    pub height: i64,
    pub capacity: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveRequestBody {
    pub packages: Vec<PackageDto>,
    pub ulds: Vec<UldDto>,
    /// When true, a synthetic response is returned without touching the
    /// cache, the database, or the solver (§6).
    #[serde(default)]
    pub mock: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDto {
    pub package_id: String,
    pub uld_id: String,
    pub p1: [i64; 3],
    pub p2: [i64; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveResponseBody {
    pub feasible: bool,
    pub unplaced_priority: Vec<String>,
    pub placements: Vec<PlacementDto>,
    pub unload_order: HashMap<String, Vec<String>>,
    pub total_cost: i64,
    pub number_packed: usize,
    pub number_priority_ulds: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Completed,
}

impl RequestStatus {
    pub fn as_db_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_db_str(raw: &str) -> RequestStatus {
        match raw {
            "COMPLETED" => RequestStatus::Completed,
            _ => RequestStatus::Pending,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RequestSummaryDto {
    pub id: i64,
    pub timestamp: String,
    pub status: RequestStatus,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveStatusDto {
    Processed { result: SolveResponseBody },
    Processing { request_id: i64 },
}

#[derive(Clone, Debug, Deserialize)]
pub struct RequestIdBody {
    pub id: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MetricsPackageDto {
    pub x1: f64,
    pub y1: f64,
    pub z1: f64,
    pub x2: f64,
    pub y2: f64,
    pub z2: f64,
    pub weight: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MetricsRequestBody {
    pub uld_length: f64,
    pub uld_width: f64,
    pub uld_height: f64,
    pub uld_weight: f64,
    pub packages: Vec<MetricsPackageDto>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MetricsResponseDto {
    pub moi: f64,
    pub count: usize,
    pub utilization: f64,
    pub weight_utilization: f64,
    pub stability: f64,
    pub pack_volume: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ApiErrorDto {
    pub error: String,
}
