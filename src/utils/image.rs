/// Split an image reference into repository and tag.
///
/// The tag is whatever follows the last `:` after the last `/`, so registry
/// ports (`registry:5000/app`) are left alone. A missing tag means `latest`.
/// Digest references are returned whole with an empty tag.
pub(crate) fn split_reference(reference: &str) -> (String, String) {
    if reference.contains('@') {
        return (reference.to_string(), String::new());
    }

    let name_start = reference.rfind('/').map(|index| index + 1).unwrap_or(0);

    match reference[name_start..].rfind(':') {
        Some(index) => {
            let split = name_start + index;
            (reference[..split].to_string(), reference[split + 1..].to_string())
        }
        None => (reference.to_string(), "latest".to_string()),
    }
}

fn normalize(reference: &str) -> String {
    let (name, tag) = split_reference(reference);
    if tag.is_empty() {
        name
    } else {
        format!("{}:{}", name, tag)
    }
}

/// Whether a container's image matches the wanted reference.
pub(crate) fn image_matches(wanted: &str, actual: &str) -> bool {
    wanted == actual || normalize(wanted) == normalize(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_reference() {
        assert_eq!(
            split_reference("aler9/rtsp-simple-server"),
            ("aler9/rtsp-simple-server".to_string(), "latest".to_string())
        );
        assert_eq!(
            split_reference("aler9/rtsp-simple-server:v0.21.0"),
            ("aler9/rtsp-simple-server".to_string(), "v0.21.0".to_string())
        );
        assert_eq!(
            split_reference("registry.local:5000/media/rtsp"),
            ("registry.local:5000/media/rtsp".to_string(), "latest".to_string())
        );
        assert_eq!(
            split_reference("registry.local:5000/media/rtsp:1.2"),
            ("registry.local:5000/media/rtsp".to_string(), "1.2".to_string())
        );
    }

    #[test]
    fn test_split_digest_reference() {
        let reference = "aler9/rtsp-simple-server@sha256:abcdef";
        assert_eq!(split_reference(reference), (reference.to_string(), String::new()));
    }

    #[test]
    fn test_image_matches() {
        assert!(image_matches("aler9/rtsp-simple-server", "aler9/rtsp-simple-server"));
        assert!(image_matches("aler9/rtsp-simple-server", "aler9/rtsp-simple-server:latest"));
        assert!(image_matches("aler9/rtsp-simple-server:latest", "aler9/rtsp-simple-server"));
        assert!(!image_matches("aler9/rtsp-simple-server", "aler9/rtsp-simple-server:v0.21.0"));
        assert!(!image_matches("aler9/rtsp-simple-server", "nginx"));
    }
}
