use clap::Parser;
use tether_gesture_feedback::feedback_api::FeedbackClient;
use tether_gesture_feedback::provider_config::ProviderConfig;
use tether_gesture_feedback::remote_provider::RemoteLandmarkProvider;
use tether_gesture_feedback::systems::Systems;
use tether_gesture_feedback::tether_interface::{
    handle_landmarks_message, handle_request_feedbacks_message, handle_submit_feedback_message,
    Inputs, Outputs,
};

use env_logger::Env;
use log::{debug, error, info};
use std::thread;
use std::time::Duration;
use tether_agent::channels::tether_compliant_topic::TetherOrCustomTopic;
use tether_agent::TetherAgentOptionsBuilder;

mod cli;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .filter_module("paho_mqtt", log::LevelFilter::Warn)
        .filter_module("tether_agent", log::LevelFilter::Warn)
        .init();

    debug!("Started; args: {:?}", cli);

    let mut tether_agent = TetherAgentOptionsBuilder::new(&cli.agent_role)
        .id(Some(&cli.agent_group))
        .host(Some(&cli.tether_host.to_string()))
        .build()
        .expect("failed to init and/or connect Tether Agent");

    let inputs = Inputs::new(&mut tether_agent);
    let outputs = Outputs::new(&mut tether_agent);

    let mut provider_config = ProviderConfig::new(&cli.config_path);

    match provider_config.load_config_from_file() {
        Ok(count) => {
            info!(
                "Loaded {} providers OK into Config; publish with retain=true",
                count
            );
            // Always publish on first start/load...
            let payload =
                rmp_serde::to_vec_named(&provider_config).expect("failed to serialize config");
            tether_agent
                .send(&outputs.config_output, Some(&payload))
                .expect("failed to publish config");
        }
        Err(e) => {
            panic!("Error loading providers into config manager: {}", e)
        }
    };

    let feedback_client = if cli.api_disable {
        info!("Feedback API disabled; gesture events will only be published");
        None
    } else {
        Some(FeedbackClient::new(&cli.api_base_url))
    };

    let mut remote_provider = cli.remote_url.as_deref().map(|url| {
        info!(
            "Polling remote landmark endpoint {} every {}ms",
            url, cli.remote_poll_interval
        );
        RemoteLandmarkProvider::new(url)
    });

    let mut systems = Systems::new();

    loop {
        let mut work_done = false;

        if let Some((topic, message)) = tether_agent.check_messages() {
            work_done = true;
            if inputs.landmarks_input.matches(&topic) {
                let serial_number = match &topic {
                    TetherOrCustomTopic::Tether(t) => {
                        t.id().expect("Tether landmark topic is missing an ID")
                    }
                    TetherOrCustomTopic::Custom(s) => {
                        panic!(
                            "The topic \"{}\" is not expected for hand landmark messages",
                            &s
                        );
                    }
                };

                match rmp_serde::from_slice::<Vec<(f32, f32)>>(&message) {
                    Ok(points) => handle_landmarks_message(
                        serial_number,
                        &points,
                        &mut provider_config,
                        &tether_agent,
                        &mut systems,
                        &outputs,
                        feedback_client.as_ref(),
                    ),
                    Err(e) => error!("Failed to decode landmarks payload: {}", e),
                }
            }

            if inputs.save_config_input.matches(&topic) {
                provider_config
                    .handle_save_message(&tether_agent, &outputs.config_output, &message)
                    .expect("config failed to update and save");
            }

            if inputs.request_config_input.matches(&topic) {
                info!("requestProviderConfig; respond with provideProviderConfig message");
                let payload =
                    rmp_serde::to_vec_named(&provider_config).expect("failed to serialize config");
                tether_agent
                    .send(&outputs.config_output, Some(&payload))
                    .expect("failed to publish config");
            }

            if inputs.submit_feedback_input.matches(&topic) {
                handle_submit_feedback_message(&message, feedback_client.as_ref());
            }

            if inputs.request_feedbacks_input.matches(&topic) {
                info!("requestFeedbacks message");
                handle_request_feedbacks_message(
                    &tether_agent,
                    &outputs,
                    feedback_client.as_ref(),
                );
            }
        }

        if let Some(provider) = remote_provider.as_mut() {
            if provider.get_elapsed() >= Duration::from_millis(cli.remote_poll_interval) {
                work_done = true;
                match provider.fetch_frame() {
                    Ok(points) => handle_landmarks_message(
                        &cli.remote_id,
                        &points,
                        &mut provider_config,
                        &tether_agent,
                        &mut systems,
                        &outputs,
                        feedback_client.as_ref(),
                    ),
                    Err(e) => error!("Failed to fetch remote landmark frame: {}", e),
                }
                provider.reset_timer();
            }
        }

        if !work_done {
            thread::sleep(Duration::from_millis(1));
        }
    }
}
