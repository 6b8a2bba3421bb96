use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BirthDetails {
    #[schema(example = "Ravi")]
    pub name: String,
    #[serde(alias = "dateOfBirth")]
    #[schema(example = "1992-03-14")]
    pub date_of_birth: String,
    #[serde(alias = "timeOfBirth", default)]
    #[schema(example = "07:45")]
    pub time_of_birth: String,
    #[serde(alias = "placeOfBirth", default)]
    #[schema(example = "Varanasi")]
    pub place_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlanetPositions {
    pub sun: String,
    pub moon: String,
    pub mars: String,
    pub mercury: String,
    pub jupiter: String,
    pub venus: String,
    pub saturn: String,
    pub rahu: String,
    pub ketu: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KundaliChart {
    pub name: String,
    pub date_of_birth: String,
    pub time_of_birth: String,
    pub place_of_birth: String,
    pub day_of_birth: String,
    pub rashi: String,
    pub rashi_hindi: String,
    pub nakshatra: String,
    pub lagna: String,
    pub lagna_hindi: String,
    pub planets: PlanetPositions,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetailedKundaliResponse {
    #[serde(flatten)]
    pub chart: KundaliChart,
    pub status: String,
    pub message: String,
    pub estimated_delivery: String,
    pub order_type: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MilanRequest {
    pub boy: BirthDetails,
    pub girl: BirthDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GunaBreakdown {
    pub varna: f64,
    pub vasya: f64,
    pub tara: f64,
    pub yoni: f64,
    pub graha_maitri: f64,
    pub gana: f64,
    pub bhakoot: f64,
    pub nadi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Compatibility {
    pub total_guna: f64,
    pub max_guna: u32,
    pub percentage: u32,
    pub recommendation: String,
    pub breakdown: GunaBreakdown,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MilanResponse {
    pub boy: KundaliChart,
    pub girl: KundaliChart,
    pub compatibility: Compatibility,
    pub status: String,
    pub message: String,
    pub estimated_delivery: String,
    pub order_type: String,
}
