//! Status word classification
//!
//! Maps a parsed [`Response`] to an [`Outcome`], depending on what the
//! driver was expecting. Both functions are total and pure.

use cardprobe_core::Response;

use crate::event::Outcome;

/// Classify the response to a SELECT
///
/// 90 00 is success; any other status word is a terminal selection failure.
pub fn classify_select(response: &Response) -> Outcome {
    if response.is_success() {
        Outcome::Success(response.payload().clone().unwrap_or_default())
    } else {
        Outcome::SelectionFailed(response.status())
    }
}

/// Classify the response to a READ RECORD
///
/// 90 00 is success; every other status word is treated uniformly as a
/// missed record. The card's precise diagnosis (6A 83, 69 85, ...) does not
/// change how enumeration proceeds, so it is not preserved here.
pub fn classify_record(response: &Response) -> Outcome {
    if response.is_success() {
        Outcome::Success(response.payload().clone().unwrap_or_default())
    } else {
        Outcome::RecordNotFound
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use cardprobe_core::StatusWord;

    use super::*;

    #[test]
    fn test_classify_select() {
        let payload = Bytes::from_static(&[0x6F, 0x1A]);
        let ok = Response::success(Some(payload.clone()));
        assert_eq!(classify_select(&ok), Outcome::Success(payload));

        let rejected = Response::error((0x6A, 0x82));
        assert_eq!(
            classify_select(&rejected),
            Outcome::SelectionFailed(StatusWord::new(0x6A, 0x82))
        );
    }

    #[test]
    fn test_classify_record_folds_all_non_success() {
        for sw in [(0x6A, 0x83), (0x6A, 0x82), (0x69, 0x85), (0x6D, 0x00)] {
            let response = Response::error(sw);
            assert_eq!(classify_record(&response), Outcome::RecordNotFound);
        }

        let ok = Response::success(None);
        assert_eq!(classify_record(&ok), Outcome::Success(Bytes::new()));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let response = Response::error((0x6A, 0x83));
        assert_eq!(classify_record(&response), classify_record(&response));
        assert_eq!(classify_select(&response), classify_select(&response));
    }
}
