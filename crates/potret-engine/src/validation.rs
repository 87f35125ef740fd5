//! Photo validation, run by the transport before the state machine is
//! invoked. A rejected photo never touches the session.

use tracing::debug;

use potret_core::{PhotoLimits, ValidationError};

/// What the transport knows about an inbound photo before downloading it.
#[derive(Debug, Clone, Default)]
pub struct PhotoInfo {
    pub file_size: u64,
    pub mime_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub fn validate_photo(info: &PhotoInfo, limits: &PhotoLimits) -> Result<(), ValidationError> {
    if info.file_size > limits.max_file_size {
        return Err(ValidationError::FileTooLarge {
            size: info.file_size,
            max: limits.max_file_size,
        });
    }

    if !limits
        .allowed_formats
        .iter()
        .any(|f| f == &info.mime_type)
    {
        return Err(ValidationError::UnsupportedFormat(info.mime_type.clone()));
    }

    if let (Some(width), Some(height)) = (info.width, info.height) {
        if width < limits.min_dimension || height < limits.min_dimension {
            return Err(ValidationError::ImageTooSmall {
                width,
                height,
                min: limits.min_dimension,
            });
        }
    }

    check_face_count(info, limits)?;
    check_solid_background(info)?;

    Ok(())
}

/// Face counting needs an external vision API; until one is wired in,
/// every photo passes when the check is enabled.
fn check_face_count(_info: &PhotoInfo, limits: &PhotoLimits) -> Result<(), ValidationError> {
    if !limits.face_detection_enabled {
        return Ok(());
    }
    debug!("face detection enabled but not implemented, skipping");
    Ok(())
}

/// Solid-background detection is likewise a stub for a future vision
/// collaborator.
fn check_solid_background(_info: &PhotoInfo) -> Result<(), ValidationError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(size: u64) -> PhotoInfo {
        PhotoInfo {
            file_size: size,
            mime_type: "image/jpeg".to_string(),
            width: None,
            height: None,
        }
    }

    #[test]
    fn accepts_a_normal_jpeg() {
        assert!(validate_photo(&jpeg(2 * 1024 * 1024), &PhotoLimits::default()).is_ok());
    }

    #[test]
    fn rejects_oversized_file() {
        let err = validate_photo(&jpeg(11 * 1024 * 1024), &PhotoLimits::default()).unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { .. }));
    }

    #[test]
    fn rejects_unsupported_format() {
        let info = PhotoInfo {
            mime_type: "image/gif".to_string(),
            ..jpeg(1024)
        };
        let err = validate_photo(&info, &PhotoLimits::default()).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedFormat("image/gif".into()));
    }

    #[test]
    fn rejects_undersized_image_when_dimensions_known() {
        let info = PhotoInfo {
            width: Some(300),
            height: Some(800),
            ..jpeg(1024)
        };
        let err = validate_photo(&info, &PhotoLimits::default()).unwrap_err();
        assert!(matches!(err, ValidationError::ImageTooSmall { .. }));
    }

    #[test]
    fn unknown_dimensions_are_not_rejected() {
        assert!(validate_photo(&jpeg(1024), &PhotoLimits::default()).is_ok());
    }
}
