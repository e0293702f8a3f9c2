//! Multi-channel conversion funnel from sales capacity to new clients

use crate::assumptions::FunnelChannel;

/// Convert available sales capacity (in hours) into newly acquired clients.
///
/// Capacity is split across channels by their configured shares; each
/// channel's time budget becomes a prospect count
/// (`time / hours_per_prospect`), and the two conversion stages apply in
/// sequence. Zero capacity yields zero clients, not an error. Rates are
/// clamped to [0, 1] by configuration validation, not here.
pub fn new_clients(capacity_hours: f64, channels: &[FunnelChannel]) -> f64 {
    channels
        .iter()
        .map(|channel| {
            let prospects = capacity_hours * channel.capacity_share / channel.hours_per_prospect;
            prospects * channel.stage1_rate * channel.stage2_rate
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_channels() -> Vec<FunnelChannel> {
        vec![
            FunnelChannel {
                name: "webinar".to_string(),
                capacity_share: 0.3,
                hours_per_prospect: 0.25,
                stage1_rate: 0.2,
                stage2_rate: 0.4,
            },
            FunnelChannel {
                name: "video_call".to_string(),
                capacity_share: 0.7,
                hours_per_prospect: 1.0,
                stage1_rate: 0.5,
                stage2_rate: 0.6,
            },
        ]
    }

    #[test]
    fn test_zero_capacity_zero_clients() {
        assert_eq!(new_clients(0.0, &test_channels()), 0.0);
    }

    #[test]
    fn test_no_channels_no_clients() {
        assert_eq!(new_clients(104.0, &[]), 0.0);
    }

    #[test]
    fn test_two_stage_conversion() {
        // 104 hours: webinar gets 31.2h -> 124.8 prospects -> 9.984 clients;
        // video call gets 72.8h -> 72.8 prospects -> 21.84 clients
        let clients = new_clients(104.0, &test_channels());

        let webinar = 104.0 * 0.3 / 0.25 * 0.2 * 0.4;
        let video_call = 104.0 * 0.7 / 1.0 * 0.5 * 0.6;
        assert_relative_eq!(clients, webinar + video_call);
    }

    #[test]
    fn test_linear_in_capacity() {
        let channels = test_channels();
        let base = new_clients(100.0, &channels);
        assert_relative_eq!(new_clients(200.0, &channels), base * 2.0);
    }
}
