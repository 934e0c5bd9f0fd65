// Display side: convention choice, fallback, configuration and render fan-out.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use airgap_qr_core::config::{CodecConfig, ConfigError, Density, RenderOptions};
    use airgap_qr_core::orchestrator::{encode_frames, EncodeError, PayloadKind, TargetConvention};
    use airgap_qr_core::render::{render_frames, QrRenderer, RenderError};
    use airgap_qr_core::session::PayloadScanSession;
    use airgap_qr_core::types::QrError;

    /// Records what it was asked to draw.
    struct TextRenderer {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl TextRenderer {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), fail_on: None }
        }
    }

    impl QrRenderer for TextRenderer {
        type Image = (u32, String);

        fn render_text(&self, text: &str, options: &RenderOptions) -> anyhow::Result<Self::Image> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_on.is_some_and(|bad| text.starts_with(bad)) {
                anyhow::bail!("symbol too dense");
            }
            Ok((options.size, text.to_string()))
        }
    }

    fn noise(len: usize) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut buf = vec![0u8; len];
        rng.fill_bytes(&mut buf);
        buf
    }

// # ✅ 1. Invalid fountain type falls back to segmented frames

    #[test]
    fn invalid_ur_type_falls_back_to_segmented() {
        let data = noise(900);
        let target = TargetConvention::Fountain { ur_type: "Not A Type!".into() };
        let encoded = encode_frames(&data, &target, PayloadKind::Psbt, &CodecConfig::default()).unwrap();

        assert!(encoded.fell_back);
        assert_eq!(encoded.convention, TargetConvention::Segmented);
        assert!(encoded.frames.iter().all(|f| f.starts_with("B$") && &f[3..4] == "P"));

        let mut session = PayloadScanSession::new();
        for frame in &encoded.frames {
            session.receive_text(frame).unwrap();
        }
        assert_eq!(session.payload().unwrap(), &data);
    }

// # ✅ 2. Non-fountain targets never fall back

    #[test]
    fn segmented_overflow_is_infeasible() {
        // more than 1295 parts of 200 characters
        let data = noise(170_000);
        let config = CodecConfig::with_density(Density::Low);
        let err = encode_frames(&data, &TargetConvention::Segmented, PayloadKind::Binary, &config).unwrap_err();
        assert!(matches!(err, EncodeError::Infeasible { convention: TargetConvention::Segmented, .. }));
        assert!(matches!(QrError::from(err), QrError::Encode(_)));
    }

    #[test]
    fn density_changes_frame_count() {
        let data = noise(3000);
        let count = |density| {
            encode_frames(&data, &TargetConvention::FountainModern, PayloadKind::Psbt, &CodecConfig::with_density(density))
                .unwrap()
                .frames
                .len()
        };
        assert!(count(Density::Low) > count(Density::Medium));
        assert!(count(Density::Medium) > count(Density::High));
    }

    #[test]
    fn json_payload_survives_simple_frames() {
        // "1234" is itself valid Base64; it must come back as text
        for json in [&b"{\"k\":1}"[..], &b"1234"[..]] {
            let encoded = encode_frames(json, &TargetConvention::Simple, PayloadKind::Json, &CodecConfig::default())
                .unwrap();
            assert_eq!(encoded.frames.len(), 1);

            let mut session = PayloadScanSession::new();
            session.receive_text(&encoded.frames[0]).unwrap();
            assert_eq!(session.payload().unwrap(), json);
        }
    }

// # ✅ 3. Configuration

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config = CodecConfig::from_json_str(r#"{"density":"high","fountain_redundancy_percent":25}"#).unwrap();
        assert_eq!(config.density, Density::High);
        assert_eq!(config.fountain_redundancy_percent, 25);
        assert_eq!(config.render, RenderOptions::default());

        let back = CodecConfig::from_json_str(&config.to_json_string().unwrap()).unwrap();
        assert_eq!(back, config);

        assert!(matches!(CodecConfig::from_json_str("{\"density\":\"huge\"}"), Err(ConfigError::Json(_))));
    }

// # ✅ 4. Render fan-out

    #[test]
    fn rendered_images_follow_frame_order() {
        let data = noise(2500);
        let mut config = CodecConfig::with_density(Density::Low);
        config.render.workers = 4;
        config.render.size = 300;
        let encoded = encode_frames(&data, &TargetConvention::FountainLegacy, PayloadKind::Psbt, &config).unwrap();

        let renderer = TextRenderer::new();
        let images = render_frames(&renderer, &encoded, &config.render).unwrap();

        assert_eq!(images.len(), encoded.frames.len());
        assert_eq!(renderer.calls.load(Ordering::Relaxed), encoded.frames.len());
        for (image, frame) in images.iter().zip(&encoded.frames) {
            assert_eq!(image, &(300, frame.clone()));
        }
    }

    #[test]
    fn renderer_failure_names_the_frame() {
        let encoded = encode_frames(&noise(1500), &TargetConvention::Simple, PayloadKind::Binary, &CodecConfig::default())
            .unwrap();
        assert!(encoded.frames.len() > 2);
        let renderer = TextRenderer { calls: AtomicUsize::new(0), fail_on: Some("p2/") };

        let err = render_frames(&renderer, &encoded, &RenderOptions { workers: 2, ..RenderOptions::default() })
            .unwrap_err();
        assert!(matches!(err, RenderError::Renderer { index: 1, .. }));
    }
}
