use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Fallback image, also used for the `clinico` analysis type.
pub const DEFAULT_IMAGE: &str = "assets/img/lab_clinico.png";

/// A laboratory record as persisted and served over HTTP.
///
/// `id` is absent until the store assigns one on first save. `image` is
/// derived from `analysis_type` and never taken from the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Laboratory {
    pub id: Option<i64>,
    pub name: String,
    pub capacity: i32,
    pub status: String,
    pub analysis_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image: String,
}

/// Caller-supplied fields for create/update: everything except `image`,
/// which the service derives. The optional `id` is only consulted by the
/// duplicate-id check on create.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LaboratoryPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        length(min = 3, max = 100, message = "name must be 3-100 characters"),
        custom(function = validate_not_blank)
    )]
    pub name: String,
    #[validate(range(min = 1, max = 1000, message = "capacity must be between 1 and 1000"))]
    pub capacity: i32,
    #[validate(custom(function = validate_status))]
    pub status: String,
    #[serde(default)]
    #[validate(
        required(message = "analysis type is required"),
        length(max = 50, message = "analysis type must be at most 50 characters"),
        custom(function = validate_not_blank)
    )]
    pub analysis_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value != "ACTIVO" && value != "INACTIVO" {
        let mut err = ValidationError::new("status");
        err.message = Some("status must be ACTIVO or INACTIVO".into());
        return Err(err);
    }
    Ok(())
}

/// Pick the image path for an analysis type.
///
/// Total over every input: matching is case-insensitive and unknown or
/// absent types fall back to the clinical image.
pub fn image_for_analysis_type(analysis_type: Option<&str>) -> &'static str {
    let Some(ty) = analysis_type else {
        return DEFAULT_IMAGE;
    };
    match ty.to_lowercase().as_str() {
        "clinico" => "assets/img/lab_clinico.png",
        "investigacion" => "assets/img/lab_investigacion.png",
        "educativo" => "assets/img/lab_educativo.png",
        "industrial" => "assets/img/lab_industrial.png",
        _ => DEFAULT_IMAGE,
    }
}
