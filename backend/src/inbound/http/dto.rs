//! Request payloads shared by more than one handler module, plus their
//! validation mapping into domain types.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{EvidenceKind, EvidenceStoreError, EvidenceUpload};
use crate::domain::{
    DepartmentId, Error, EvidenceUploads, GeoPoint, IncidentType, Priority, ReportDraft,
    ReportValidationError,
};

use super::ApiResult;

/// Build a field-tagged validation error.
pub(crate) fn field_error(message: impl Into<String>, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

/// Search query string, as posted by the board search boxes.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text filter; blank returns the full scoped listing.
    #[serde(default)]
    pub q: Option<String>,
}

/// Base64 evidence payload captured client-side.
///
/// `data` accepts both a bare base64 string and a full
/// `data:<mime>;base64,<payload>` URL as produced by browser capture
/// widgets.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidencePayload {
    /// Base64-encoded file contents.
    pub data: String,
    /// File extension without the dot, e.g. `png`.
    pub extension: String,
}

fn decode_evidence(kind: EvidenceKind, payload: &EvidencePayload) -> ApiResult<EvidenceUpload> {
    let data = payload
        .data
        .split_once("base64,")
        .map_or(payload.data.as_str(), |(_, rest)| rest);
    let bytes = BASE64_STANDARD
        .decode(data.trim())
        .map_err(|err| field_error(
            format!("evidence payload is not valid base64: {err}"),
            "evidence",
            "bad_encoding",
        ))?;
    EvidenceUpload::try_new(kind, &payload.extension, bytes).map_err(|err| match err {
        EvidenceStoreError::InvalidPayload { message } => {
            field_error(message, "evidence", "bad_payload")
        }
        other => Error::internal(other.to_string()),
    })
}

/// Report submission body shared by the officer and citizen endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReportRequest {
    /// Short summary.
    pub title: String,
    /// Full incident description.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Incident classification code, e.g. `THEFT`.
    pub incident_type: String,
    /// Urgency classification; defaults to `Medium`.
    #[serde(default)]
    pub priority: Option<String>,
    /// Requested routing; ignored for officers, whose own department wins.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// GPS latitude; requires `longitude`.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// GPS longitude; requires `latitude`.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Photo evidence.
    #[serde(default)]
    pub evidence_image: Option<EvidencePayload>,
    /// Video evidence.
    #[serde(default)]
    pub evidence_video: Option<EvidencePayload>,
    /// Audio evidence.
    #[serde(default)]
    pub evidence_audio: Option<EvidencePayload>,
}

fn map_draft_error(error: ReportValidationError) -> Error {
    let field = match &error {
        ReportValidationError::EmptyTitle | ReportValidationError::TitleTooLong { .. } => "title",
        ReportValidationError::EmptyDescription => "description",
        ReportValidationError::EmptyLocation | ReportValidationError::LocationTooLong { .. } => {
            "location"
        }
    };
    field_error(error.to_string(), field, "invalid")
}

impl NewReportRequest {
    /// Validate the payload into a domain draft plus decoded evidence.
    pub fn into_parts(self) -> ApiResult<(ReportDraft, EvidenceUploads)> {
        let incident_type = IncidentType::parse(&self.incident_type).ok_or_else(|| {
            field_error(
                format!("unknown incident type: {}", self.incident_type),
                "incidentType",
                "unknown_incident_type",
            )
        })?;
        let priority = match self.priority.as_deref() {
            None | Some("") => Priority::default(),
            Some(raw) => Priority::parse(raw).ok_or_else(|| {
                field_error(
                    format!("unknown priority: {raw}"),
                    "priority",
                    "unknown_priority",
                )
            })?,
        };
        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(
                GeoPoint::new(latitude, longitude)
                    .map_err(|err| field_error(err.to_string(), "coordinates", "out_of_range"))?,
            ),
            (None, None) => None,
            _ => {
                return Err(field_error(
                    "latitude and longitude must be provided together",
                    "coordinates",
                    "incomplete",
                ))
            }
        };

        let draft = ReportDraft::try_new(
            &self.title,
            &self.description,
            &self.location,
            coordinates,
            incident_type,
            priority,
            self.department_id.map(DepartmentId::from_uuid),
        )
        .map_err(map_draft_error)?;

        let uploads = EvidenceUploads {
            image: self
                .evidence_image
                .as_ref()
                .map(|payload| decode_evidence(EvidenceKind::Image, payload))
                .transpose()?,
            video: self
                .evidence_video
                .as_ref()
                .map(|payload| decode_evidence(EvidenceKind::Video, payload))
                .transpose()?,
            audio: self
                .evidence_audio
                .as_ref()
                .map(|payload| decode_evidence(EvidenceKind::Audio, payload))
                .transpose()?,
        };
        Ok((draft, uploads))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    fn request() -> NewReportRequest {
        NewReportRequest {
            title: "Stolen bike".into(),
            description: "Taken overnight".into(),
            location: "Market Square".into(),
            incident_type: "THEFT".into(),
            priority: None,
            department_id: None,
            latitude: None,
            longitude: None,
            evidence_image: None,
            evidence_video: None,
            evidence_audio: None,
        }
    }

    #[test]
    fn minimal_requests_default_to_medium_priority() {
        let (draft, uploads) = request().into_parts().expect("valid request");
        assert_eq!(draft.priority, Priority::Medium);
        assert!(uploads.image.is_none());
    }

    #[test]
    fn unknown_incident_types_are_field_errors() {
        let mut payload = request();
        payload.incident_type = "JAYWALKING".into();
        let err = payload.into_parts().expect_err("unknown type");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d["field"].as_str()),
            Some("incidentType")
        );
    }

    #[test]
    fn one_sided_coordinates_are_rejected() {
        let mut payload = request();
        payload.latitude = Some(51.5);
        let err = payload.into_parts().expect_err("incomplete coordinates");
        assert_eq!(
            err.details().and_then(|d| d["field"].as_str()),
            Some("coordinates")
        );
    }

    #[test]
    fn data_url_prefixes_are_stripped_from_evidence() {
        let mut payload = request();
        payload.evidence_image = Some(EvidencePayload {
            data: "data:image/png;base64,AQID".into(),
            extension: "png".into(),
        });
        let (_, uploads) = payload.into_parts().expect("valid request");
        let image = uploads.image.expect("image decoded");
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.extension, "png");
    }

    #[test]
    fn bad_base64_is_a_field_error() {
        let mut payload = request();
        payload.evidence_audio = Some(EvidencePayload {
            data: "!!!not base64!!!".into(),
            extension: "ogg".into(),
        });
        let err = payload.into_parts().expect_err("bad encoding");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
