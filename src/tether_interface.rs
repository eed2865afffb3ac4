use std::time::Instant;

use log::{debug, error, info, warn};
use serde::Serialize;
use tether_agent::{ChannelDefinition, ChannelOptionsBuilder, TetherAgent};

use crate::{
    feedback_api::{FeedbackClient, FeedbackRecord},
    landmarks::HandLandmarks,
    provider_config::ProviderConfig,
    systems::{
        classifier::{classify, GestureDiagnostics, GestureLabel},
        Systems,
    },
    Point2D,
};

pub struct Outputs {
    pub config_output: ChannelDefinition,
    pub gesture_events_output: ChannelDefinition,
    pub diagnostics_output: ChannelDefinition,
    pub feedbacks_output: ChannelDefinition,
}

impl Outputs {
    pub fn new(tether_agent: &mut TetherAgent) -> Outputs {
        let config_output = ChannelOptionsBuilder::create_sender("provideProviderConfig")
            .qos(Some(2))
            .retain(Some(true))
            .build(tether_agent)
            .expect("failed to create Output Channel");

        // One discrete event per debounced gesture
        let gesture_events_output = ChannelOptionsBuilder::create_sender("gestureEvents")
            .qos(Some(1))
            .build(tether_agent)
            .expect("failed to create Output Channel");

        // Per-frame classifier measurements, for display only
        let diagnostics_output = ChannelOptionsBuilder::create_sender("gestureDiagnostics")
            .qos(Some(0))
            .build(tether_agent)
            .expect("failed to create Output Channel");

        let feedbacks_output = ChannelOptionsBuilder::create_sender("feedbacks")
            .qos(Some(1))
            .build(tether_agent)
            .expect("failed to create Output Channel");

        Outputs {
            config_output,
            gesture_events_output,
            diagnostics_output,
            feedbacks_output,
        }
    }
}

pub struct Inputs {
    pub landmarks_input: ChannelDefinition,
    pub save_config_input: ChannelDefinition,
    pub request_config_input: ChannelDefinition,
    pub submit_feedback_input: ChannelDefinition,
    pub request_feedbacks_input: ChannelDefinition,
}

impl Inputs {
    pub fn new(tether_agent: &mut TetherAgent) -> Inputs {
        // Some subscriptions
        let landmarks_input = ChannelOptionsBuilder::create_receiver("handLandmarks")
            .qos(Some(0))
            .build(tether_agent)
            .expect("failed to create Input Channel");
        let save_config_input = ChannelOptionsBuilder::create_receiver("saveProviderConfig")
            .qos(Some(2))
            .build(tether_agent)
            .expect("failed to create Input Channel");
        let request_config_input = ChannelOptionsBuilder::create_receiver("requestProviderConfig")
            .qos(Some(2))
            .build(tether_agent)
            .expect("failed to create Input Channel");
        let submit_feedback_input = ChannelOptionsBuilder::create_receiver("submitFeedback")
            .qos(Some(2))
            .build(tether_agent)
            .expect("failed to create Input Channel");
        let request_feedbacks_input = ChannelOptionsBuilder::create_receiver("requestFeedbacks")
            .qos(Some(2))
            .build(tether_agent)
            .expect("failed to create Input Channel");

        Inputs {
            landmarks_input,
            save_config_input,
            request_config_input,
            submit_feedback_input,
            request_feedbacks_input,
        }
    }
}

/// Published on every processed frame, whether or not a hand (or gesture)
/// was found; `diagnostics` is absent on no-hand ticks.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub label: GestureLabel,
    pub cooldown_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<GestureDiagnostics>,
}

/// The shared per-frame path for both transports (Tether providers and the
/// polled remote endpoint): validate, classify, debounce, publish.
pub fn handle_landmarks_message(
    serial: &str,
    points: &[Point2D],
    config: &mut ProviderConfig,
    tether_agent: &TetherAgent,
    systems: &mut Systems,
    outputs: &Outputs,
    feedback_client: Option<&FeedbackClient>,
) {
    // If an unknown provider was found (and added), re-publish the Provider config
    if let Some(()) = config.check_or_create_provider(serial) {
        config
            .save_and_republish(tether_agent, &outputs.config_output)
            .expect("failed to save and republish config");
    }

    let hand = match HandLandmarks::from_frame(points) {
        Ok(hand) => hand,
        Err(e) => {
            error!(
                "Dropping malformed landmark frame from \"{}\": {}",
                serial, e
            );
            return;
        }
    };

    if let Some(provider) = config.get_provider(serial) {
        let session = systems.session_mut(&provider.serial);
        if session.busy {
            debug!(
                "Session \"{}\" still dispatching an event; skip frame",
                serial
            );
            return;
        }

        let now = Instant::now();
        let (label, diagnostics) = match &hand {
            Some(hand) => {
                let (label, diagnostics) = classify(hand);
                (label, Some(diagnostics))
            }
            None => (GestureLabel::None, None),
        };

        let event = session.debouncer.tick(label, now);

        let report = TickReport {
            label,
            cooldown_active: session.debouncer.is_cooling_down(now),
            diagnostics,
        };
        let payload = rmp_serde::to_vec_named(&report).expect("failed to serialize tick report");
        tether_agent
            .send(&outputs.diagnostics_output, Some(&payload))
            .expect("failed to publish diagnostics");

        if let Some(event) = event {
            session.busy = true;
            info!("Gesture event from \"{}\": {:?}", serial, event.label);

            let payload =
                rmp_serde::to_vec_named(&event).expect("failed to serialize gesture event");
            tether_agent
                .send(&outputs.gesture_events_output, Some(&payload))
                .expect("failed to publish gesture event");

            // Positive gestures submit a feedback record immediately; negative
            // ones only publish the event, since the data-entry form (and its
            // eventual submission) belongs to the UI collaborator
            if event.label == GestureLabel::Positive {
                if let Some(client) = feedback_client {
                    match client.create_feedback(&FeedbackRecord::positive()) {
                        Ok(()) => info!("Positive feedback recorded"),
                        Err(e) => {
                            // No retry; the cooldown stays armed either way
                            error!("Failed to record feedback: {}", e);
                        }
                    }
                }
            }
            session.busy = false;
        }
    } else {
        error!("Failed to find provider; it should have been added if it was unknown");
    }
}

/// Relay a full feedback record (the negative-feedback form's payload,
/// arriving over the bus) to the REST API.
pub fn handle_submit_feedback_message(
    incoming_message: &[u8],
    feedback_client: Option<&FeedbackClient>,
) {
    let record = match rmp_serde::from_slice::<FeedbackRecord>(incoming_message) {
        Ok(record) => record,
        Err(e) => {
            error!("Failed to parse feedback record: {}", e);
            return;
        }
    };

    match feedback_client {
        Some(client) => match client.create_feedback(&record) {
            Ok(()) => info!("Relayed {:?} feedback record to API", record.kind),
            Err(e) => error!("Failed to relay feedback record: {}", e),
        },
        None => warn!("Feedback API disabled; incoming record dropped"),
    }
}

/// Fetch the full feedback list from the REST API and publish it
pub fn handle_request_feedbacks_message(
    tether_agent: &TetherAgent,
    outputs: &Outputs,
    feedback_client: Option<&FeedbackClient>,
) {
    let client = match feedback_client {
        Some(client) => client,
        None => {
            warn!("Feedback API disabled; cannot list feedbacks");
            return;
        }
    };

    match client.list_feedbacks() {
        Ok(records) => {
            info!("Fetched {} feedback records", records.len());
            let payload =
                rmp_serde::to_vec_named(&records).expect("failed to serialize feedbacks");
            tether_agent
                .send(&outputs.feedbacks_output, Some(&payload))
                .expect("failed to publish feedbacks");
        }
        Err(e) => error!("Failed to fetch feedbacks: {}", e),
    }
}
