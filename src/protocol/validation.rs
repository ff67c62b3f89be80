use crate::config::ProtocolConfig;
use crate::entropy::MAX_SAFE_WINNERS;

use super::error::ValidationError;

pub fn validate_delay(cfg: &ProtocolConfig, delay: u8) -> Result<(), ValidationError> {
    if u64::from(delay) < cfg.safety_round_gap {
        return Err(ValidationError::RoundDelayTooShort {
            delay,
            gap: cfg.safety_round_gap,
        });
    }
    Ok(())
}

pub fn validate_selection(participants: u32, winners: u8) -> Result<(), ValidationError> {
    if winners == 0 || winners > MAX_SAFE_WINNERS {
        return Err(ValidationError::WinnerCount(winners));
    }
    if participants < 2 {
        return Err(ValidationError::ParticipantCount(participants));
    }
    if u32::from(winners) > participants {
        return Err(ValidationError::WinnersExceedParticipants {
            participants,
            winners,
        });
    }
    Ok(())
}

pub fn target_round(current: u64, delay: u8) -> Result<u64, ValidationError> {
    current
        .checked_add(u64::from(delay))
        .ok_or(ValidationError::RoundOverflow {
            round: current,
            delay,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_must_cover_the_gap() {
        let cfg = ProtocolConfig {
            safety_round_gap: 3,
            ..ProtocolConfig::default()
        };
        assert_eq!(
            validate_delay(&cfg, 2),
            Err(ValidationError::RoundDelayTooShort { delay: 2, gap: 3 })
        );
        assert!(validate_delay(&cfg, 3).is_ok());
    }

    #[test]
    fn selection_bounds() {
        assert_eq!(
            validate_selection(10, 0),
            Err(ValidationError::WinnerCount(0))
        );
        assert_eq!(
            validate_selection(100, 35),
            Err(ValidationError::WinnerCount(35))
        );
        assert_eq!(
            validate_selection(1, 1),
            Err(ValidationError::ParticipantCount(1))
        );
        assert_eq!(
            validate_selection(3, 4),
            Err(ValidationError::WinnersExceedParticipants {
                participants: 3,
                winners: 4
            })
        );
        assert!(validate_selection(2, 2).is_ok());
    }

    #[test]
    fn target_round_overflow_is_an_error() {
        assert_eq!(target_round(10, 5), Ok(15));
        assert!(target_round(u64::MAX, 1).is_err());
    }
}
