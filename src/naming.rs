//! Job naming
//!
//! Produces a [`JobId`] and its [`OutputPathTemplate`] without I/O, locks or
//! shared counters, so any number of requests can name jobs concurrently.
//! Uniqueness rests on the millisecond timestamp plus a random token of
//! [`SUFFIX_LEN`] base-36 characters (about 51 bits per millisecond).

use crate::types::{JobId, OutputPathTemplate};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::path::Path;

/// Length of the random part of a job name
pub const SUFFIX_LEN: usize = 10;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Create a job identifier from a clock reading and a random source
pub fn new_job_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> JobId {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    JobId::new(now.timestamp_millis(), suffix)
}

/// Name a new job started now, with its output template inside `output_dir`
pub fn name_job(output_dir: &Path) -> (JobId, OutputPathTemplate) {
    let job_id = new_job_id(Utc::now(), &mut rand::thread_rng());
    let template = OutputPathTemplate::for_job(output_dir, &job_id);
    (job_id, template)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_suffix_shape() {
        let id = new_job_id(Utc::now(), &mut rand::thread_rng());
        assert_eq!(id.random_suffix.len(), SUFFIX_LEN);
        assert!(
            id.random_suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_timestamp_is_milliseconds() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let id = new_job_id(now, &mut StdRng::seed_from_u64(7));
        assert_eq!(id.timestamp, 1_700_000_000_123);
    }

    #[test]
    fn test_same_millisecond_never_collides() {
        // Every sample shares one frozen timestamp, so only the suffix separates them
        let now = Utc::now();
        let mut rng = rand::thread_rng();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = new_job_id(now, &mut rng);
            assert!(seen.insert(id.to_string()), "duplicate job id {id}");
        }
    }

    #[test]
    fn test_concurrent_naming_is_unique() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..2_000)
                        .map(|_| name_job(Path::new("/videos")).1)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for template in handle.join().unwrap() {
                assert!(seen.insert(template.to_string()));
            }
        }
        assert_eq!(seen.len(), 16_000);
    }

    #[test]
    fn test_template_points_into_output_dir() {
        let (id, template) = name_job(Path::new("/srv/videos"));
        assert_eq!(
            template.as_path(),
            Path::new(&format!("/srv/videos/video_{}.%(ext)s", id))
        );
    }
}
