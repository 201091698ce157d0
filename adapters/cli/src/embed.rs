//! Base64 embedding of generated artifacts into host page markup.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use growth_model_rendering::RenderingError;

/// Display height reserved for the embedded animation, in pixels.
pub(crate) const ANIMATION_HEIGHT: u32 = 400;

/// Encodes `bytes` as a `data:` URI of the given media type.
pub(crate) fn data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Wraps an encoded GIF in markup with a fixed display height.
///
/// The image carries no playback controls; it loops on its own.
pub(crate) fn embed_animation(gif: &[u8], height: u32) -> Result<String, RenderingError> {
    if gif.is_empty() {
        return Err(RenderingError::EncodingFailure {
            artifact: "embedded animation",
            reason: "animation payload was empty".to_owned(),
        });
    }

    Ok(format!(
        r#"<div class="animation" style="height:{height}px;overflow:hidden"><img src="{}" alt="Animated growth progression" style="max-height:{height}px"/></div>"#,
        data_uri("image/gif", gif)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_round_trips_payload() {
        let payload = b"GIF89a\x01\x00\x01\x00";
        let uri = data_uri("image/gif", payload);

        let encoded = uri
            .strip_prefix("data:image/gif;base64,")
            .expect("uri carries media type prefix");
        let decoded = STANDARD.decode(encoded).expect("payload decodes");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn embedded_animation_has_fixed_height() {
        let markup = embed_animation(b"GIF89a", ANIMATION_HEIGHT).expect("payload embeds");

        assert!(markup.contains("height:400px"));
        assert!(markup.contains(r#"<img src="data:image/gif;base64,R0lGODlh""#));
        assert!(!markup.contains("controls"));
    }

    #[test]
    fn empty_payload_is_an_encoding_failure() {
        assert!(matches!(
            embed_animation(&[], ANIMATION_HEIGHT),
            Err(RenderingError::EncodingFailure { .. })
        ));
    }
}
