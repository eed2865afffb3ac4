use std::fs;

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tether_agent::{ChannelDefinition, TetherAgent};

const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// One registered landmark provider (a camera front-end running hand
/// tracking). The confidence/selfie fields are not interpreted here; they
/// are carried in the retained config message for providers to apply to
/// their own tracking models.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkProvider {
    pub serial: String,
    pub name: String,
    pub colour: String,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    /// Providers facing the user should mirror the image horizontally
    pub selfie_mode: bool,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    providers: Vec<LandmarkProvider>,
    #[serde(skip)]
    config_file_path: String,
}

impl ProviderConfig {
    pub fn new(config_file_path: &str) -> ProviderConfig {
        ProviderConfig {
            providers: vec![],
            config_file_path: String::from(config_file_path),
        }
    }

    pub fn parse_remote_config(&mut self, incoming_message: &[u8]) -> Result<()> {
        let payload = incoming_message.to_vec();

        match rmp_serde::from_slice::<ProviderConfig>(&payload) {
            Ok(config) => {
                self.providers = config.providers;
                Ok(())
            }
            Err(e) => {
                error!("Failed to parse Config from message: {}", e);
                Err(anyhow!("failed to parse Config from message: {}", e))
            }
        }
    }

    pub fn load_config_from_file(&mut self) -> Result<usize> {
        let text = match fs::read_to_string(&self.config_file_path) {
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    warn!("Provider Config file not found, will create a blank one");
                    String::from("{\"providers\": [] }")
                } else {
                    return Err(anyhow!(
                        "failed to load Provider Config from disk; error: {:?}",
                        e
                    ));
                }
            }
            Ok(s) => {
                info!(
                    "Loaded Provider config OK from \"{}\"",
                    &self.config_file_path
                );
                s
            }
        };

        match serde_json::from_str::<ProviderConfig>(&text) {
            Ok(data) => {
                debug!("Config parsed data from file: {:?}", data);
                self.providers = data.providers;
                Ok(self.providers.len())
            }
            Err(e) => Err(anyhow!("failed to parse config data: {}", e)),
        }
    }

    pub fn write_config_to_file(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(&self.config_file_path, text)
            .map_err(|e| anyhow!("error writing config to file: {:?}", e))?;
        info!("Wrote config to file: {:?}", self.config_file_path);
        Ok(())
    }

    /**  If the provider is known, return None; if unknown, create it and
    return Some(())
    */
    pub fn check_or_create_provider(&mut self, serial: &str) -> Option<()> {
        let existing = self.providers.iter().find(|&p| p.serial.eq(serial));
        match existing {
            Some(_provider) => None,
            None => {
                warn!("Unrecognised provider for serial {}", serial);
                let new_provider = LandmarkProvider {
                    serial: String::from(serial),
                    name: String::from(serial),
                    colour: pick_from_palette(self.providers.len()),
                    min_detection_confidence: DEFAULT_MIN_CONFIDENCE,
                    min_tracking_confidence: DEFAULT_MIN_CONFIDENCE,
                    selfie_mode: true,
                };
                self.providers.push(new_provider);
                info!("Creating a provider with defaults for serial {}", serial);
                Some(())
            }
        }
    }

    pub fn get_provider(&self, serial: &str) -> Option<&LandmarkProvider> {
        self.providers.iter().find(|&p| p.serial.eq(serial))
    }

    pub fn providers(&self) -> &[LandmarkProvider] {
        &self.providers
    }

    pub fn handle_save_message(
        &mut self,
        tether_agent: &TetherAgent,
        config_output: &ChannelDefinition,
        incoming_message: &[u8],
    ) -> Result<()> {
        self.parse_remote_config(incoming_message)?;
        info!("Remote-provided config parsed OK; now save to disk and (re) publish");
        self.save_and_republish(tether_agent, config_output)
    }

    pub fn save_and_republish(
        &self,
        tether_agent: &TetherAgent,
        config_output: &ChannelDefinition,
    ) -> Result<()> {
        info!("Saving config to disk and re-publishing via Tether...");
        self.write_config_to_file()?;

        let payload = rmp_serde::to_vec_named(self).expect("failed to serialize config");
        tether_agent
            .send(config_output, Some(&payload))
            .expect("failed to publish config");
        Ok(())
    }
}

const PALETTE: &[&str] = &["#ffff00", "#00ffff", "#ff00ff"];

fn pick_from_palette(index: usize) -> String {
    let c = PALETTE[index % PALETTE.len()];
    String::from(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_or_create_provider() {
        let mut config = ProviderConfig::new("./unused.json");

        assert_eq!(config.check_or_create_provider("cam-01"), Some(()));
        // Known serial: nothing created, nothing to republish
        assert_eq!(config.check_or_create_provider("cam-01"), None);
        assert_eq!(config.providers().len(), 1);

        let provider = config.get_provider("cam-01").unwrap();
        assert_eq!(provider.name, "cam-01");
        assert_eq!(provider.min_detection_confidence, 0.5);
        assert!(provider.selfie_mode);
    }

    #[test]
    fn test_palette_cycles() {
        let mut config = ProviderConfig::new("./unused.json");
        for i in 0..4 {
            config.check_or_create_provider(&format!("cam-{}", i));
        }
        let colours: Vec<&str> = config
            .providers()
            .iter()
            .map(|p| p.colour.as_str())
            .collect();
        assert_eq!(colours, vec!["#ffff00", "#00ffff", "#ff00ff", "#ffff00"]);
    }
}
