// Expiry display for the current default profile
use crate::models::expiry_skew;
use chrono::{DateTime, Utc};

pub fn format_time_remaining(expires_at: &DateTime<Utc>) -> String {
    let now = Utc::now();
    if *expires_at <= now {
        return "EXPIRED".to_string();
    }

    let duration = (*expires_at - now).num_seconds();
    let hours = duration / 3600;
    let minutes = (duration % 3600) / 60;
    let seconds = duration % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// One-line status for the switch banner
pub fn expiry_notice(expires_at: &DateTime<Utc>) -> String {
    let now = Utc::now();
    if *expires_at <= now {
        "WARNING: Expired".to_string()
    } else if *expires_at <= now + expiry_skew() {
        "WARNING: Expires in less than 2 minutes".to_string()
    } else {
        format!(
            "INFO: This profile expires in {}",
            format_time_remaining(expires_at)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_time_remaining() {
        let expires = Utc::now() + Duration::minutes(90) + Duration::seconds(30);
        assert!(format_time_remaining(&expires).starts_with("1h"));

        let expired = Utc::now() - Duration::minutes(1);
        assert_eq!(format_time_remaining(&expired), "EXPIRED");
    }

    #[test]
    fn test_expiry_notice_bands() {
        let expired = Utc::now() - Duration::minutes(1);
        assert_eq!(expiry_notice(&expired), "WARNING: Expired");

        let soon = Utc::now() + Duration::seconds(60);
        assert_eq!(
            expiry_notice(&soon),
            "WARNING: Expires in less than 2 minutes"
        );

        let later = Utc::now() + Duration::minutes(45);
        assert!(expiry_notice(&later).starts_with("INFO: This profile expires in"));
    }
}
