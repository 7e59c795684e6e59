use wayfare_core::share::TripShare;
use wayfare_core::validate::BookingPolicy;

use crate::TripError;

/// Validate a share request against the group's existing invitations.
///
/// Invitations are deduplicated: a pending or accepted invite to the same
/// address blocks a re-invite (declined ones do not), and each group carries
/// a hard cap on live shares.
pub fn check_share_request(
    existing: &[TripShare],
    email: &str,
    policy: &BookingPolicy,
) -> Result<(), TripError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || email.len() > 255 {
        return Err(TripError::Validation("Invalid email format".into()));
    }

    let live = existing.iter().filter(|s| s.is_live());
    if live.clone().count() as u32 >= policy.max_shares_per_trip {
        return Err(TripError::Policy(format!(
            "Trip cannot be shared with more than {} people",
            policy.max_shares_per_trip
        )));
    }

    if live
        .clone()
        .any(|s| s.shared_with_email.eq_ignore_ascii_case(email))
    {
        return Err(TripError::Policy(format!(
            "Trip is already shared with {email}"
        )));
    }

    Ok(())
}
