//! Recommendation flow
//!
//! Parses the user's comma-separated feature text, validates it and asks the
//! recommendation service for a label.

use bsx_common::{ClientEvent, StatusMessage};
use tracing::{debug, error, info, warn};

use crate::controller::ClientContext;
use crate::messages;
use crate::session::RecommendationResult;

/// Parse comma-separated numbers into a feature vector
///
/// Parsing is lenient: each segment is trimmed and its leading number is
/// taken, ignoring anything after it (`"3 kg"` reads as 3). Segments with
/// no leading number, and values that are not finite, are dropped rather
/// than rejecting the whole input.
///
/// # Examples
///
/// ```
/// use bsx_client::recommend::parse_features;
///
/// assert_eq!(parse_features("1, 2.5, abc, 3"), vec![1.0, 2.5, 3.0]);
/// assert_eq!(parse_features("1, 2x, 3 kg, 4"), vec![1.0, 2.0, 3.0, 4.0]);
/// assert!(parse_features("abc, , xyz").is_empty());
/// ```
pub fn parse_features(raw: &str) -> Vec<f64> {
    raw.split(',')
        .filter_map(|segment| leading_float(segment.trim()))
        .filter(|value| value.is_finite())
        .collect()
}

/// Longest prefix of `text` that reads as a decimal float
///
/// Accepts an optional sign, digits with an optional fraction (at least one
/// digit overall) and an optional exponent. An exponent marker without
/// digits is left unconsumed, so `"1e"` reads as 1.
fn leading_float(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Request a recommendation for the current input text
///
/// Preconditions, checked in order: a token is present, the input is not
/// blank, the parsed vector is not empty. Any failing short-circuits with a
/// warning and no request.
pub async fn request_recommendation(ctx: &ClientContext) -> StatusMessage {
    let (token, input, session_id) = {
        let state = ctx.read_state();
        (
            state.session.token().map(str::to_string),
            state.recommend_input.clone(),
            state.session_id,
        )
    };

    let Some(token) = token else {
        debug!(%session_id, "Recommendation rejected: not logged in");
        return ctx.status.warning(messages::LOGIN_FIRST);
    };

    if input.trim().is_empty() {
        debug!(%session_id, "Recommendation rejected: empty input");
        return ctx.status.warning(messages::ENTER_FEATURES);
    }

    let features = parse_features(&input);
    if features.is_empty() {
        debug!(%session_id, input = %input, "Recommendation rejected: no numeric features");
        return ctx.status.warning(messages::INVALID_FEATURES);
    }

    info!(%session_id, count = features.len(), "Sending features: {:?}", features);

    match ctx.backend.recommend(&token, &features).await {
        Ok(label) => {
            info!(%session_id, recommendation = %label, "Recommendation received");

            // A logout (or re-login) while the request was in flight owns
            // the result slot now
            let stored = {
                let mut state = ctx.write_state();
                if state.session.token() == Some(token.as_str()) {
                    state.recommendation = Some(RecommendationResult {
                        label: label.clone(),
                    });
                    true
                } else {
                    false
                }
            };

            if stored {
                ctx.events
                    .emit_lossy(ClientEvent::RecommendationReceived { label });
                ctx.status.success(messages::RECOMMENDATION_RECEIVED)
            } else {
                warn!(%session_id, "Session changed during request; recommendation discarded");
                ctx.status.warning(messages::RECOMMENDATION_DISCARDED)
            }
        }
        Err(err) => {
            error!(
                %session_id,
                status = ?err.status(),
                error = %err,
                body = ?err.body(),
                "Recommendation request failed"
            );
            ctx.status.error(messages::RECOMMENDATION_FAILED)
        }
    }
}
