//! Tests for error types including source chaining, context and formatting

#[cfg(test)]
mod tests {
    use greedyfill::AlgorithmError;
    use greedyfill::io::error::{WithContext, invalid_parameter, path_error};
    use std::error::Error;
    use std::path::Path;

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = AlgorithmError::FileSystem {
            path: "/tmp/test.png".into(),
            operation: "read",
            source: io_error,
        };

        assert!(error.source().is_some());
        assert!(error.to_string().contains("/tmp/test.png"));
    }

    // Tests NoValidCandidate formatting names target and iteration
    // Verified by omitting iteration from message
    #[test]
    fn test_no_valid_candidate_error() {
        let error = AlgorithmError::NoValidCandidate {
            iteration: 42,
            target: [3, 7],
        };

        let message = error.to_string();
        assert!(message.contains("iteration 42"));
        assert!(message.contains("(3, 7)"));
        assert!(error.source().is_none());
    }

    // Tests dimension mismatches report both sizes
    // Verified by printing only the image size
    #[test]
    fn test_dimension_mismatch_error() {
        let error = AlgorithmError::DimensionMismatch {
            image: (10, 20),
            other: (5, 6),
        };
        let message = error.to_string();
        assert!(message.contains("10x20"));
        assert!(message.contains("5x6"));
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("patch_radius", &0, &"must be at least 1");

        let message = error.to_string();
        assert!(message.contains("patch_radius"));
        assert!(message.contains("'0'"));
        assert!(message.contains("must be at least 1"));
    }

    // Tests path errors carry the offending path
    // Verified by dropping the path from the value
    #[test]
    fn test_path_error() {
        let error = path_error(Path::new("missing_mask.png"), "Mask file not found");
        let message = error.to_string();
        assert!(message.contains("missing_mask.png"));
        assert!(message.contains("Mask file not found"));
    }

    // Tests InvalidState names the operation and state
    // Verified by swapping operation and state in the message
    #[test]
    fn test_invalid_state_error() {
        let error = AlgorithmError::InvalidState {
            operation: "iterate",
            state: "uninitialized".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot iterate while inpainter is uninitialized"
        );
    }

    // Tests iteration context rewrites loop errors only
    // Verified by applying context to every variant
    #[test]
    fn test_with_iteration_context() {
        let failed: Result<(), AlgorithmError> = Err(AlgorithmError::InconsistentMaskState {
            iteration: 0,
            hole_pixels: 4,
        });
        assert!(matches!(
            failed.with_iteration(9),
            Err(AlgorithmError::InconsistentMaskState { iteration: 9, hole_pixels: 4 })
        ));

        let candidate: Result<(), AlgorithmError> = Err(AlgorithmError::NoValidCandidate {
            iteration: 0,
            target: [0, 0],
        });
        assert!(matches!(
            candidate.with_iteration(3),
            Err(AlgorithmError::NoValidCandidate { iteration: 3, target: [0, 0] })
        ));

        let other: Result<(), AlgorithmError> = Err(invalid_parameter("seed", &1, &"bad"));
        assert!(matches!(
            other.with_iteration(2),
            Err(AlgorithmError::InvalidParameter { parameter: "seed", .. })
        ));
    }

    // Tests io errors convert into file system errors
    // Verified by converting into ImageLoad instead
    #[test]
    fn test_io_error_conversion() {
        let io_result: Result<(), std::io::Error> =
            Err(std::io::Error::other("disk full"));
        assert!(matches!(
            io_result.with_iteration(1),
            Err(AlgorithmError::FileSystem { operation: "unknown", .. })
        ));
    }
}
