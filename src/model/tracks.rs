//! Track URI filtering and shuffling

use rand::Rng;
use rand::seq::SliceRandom;

const TRACK_URI_PREFIX: &str = "spotify:track:";

/// True for `spotify:track:<id>` with a non-empty base-62 id.
///
/// Local files carry no id and episodes use a different prefix, so both are
/// rejected here.
pub fn is_valid_track_uri(uri: &str) -> bool {
    match uri.strip_prefix(TRACK_URI_PREFIX) {
        Some(id) => !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

/// Keep the valid track URIs, in their original order
pub fn filter_track_uris<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    entries
        .into_iter()
        .flatten()
        .filter(|uri| is_valid_track_uri(uri))
        .collect()
}

/// Uniform in-place permutation (Fisher-Yates)
pub fn shuffle_uris<R: Rng + ?Sized>(uris: &mut [String], rng: &mut R) {
    uris.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn accepts_only_track_uris_with_an_id() {
        assert!(is_valid_track_uri("spotify:track:4uLU6hMCjMI75M1A2tKUQC"));
        assert!(is_valid_track_uri("spotify:track:a"));

        assert!(!is_valid_track_uri("spotify:track:"));
        assert!(!is_valid_track_uri("spotify:episode:512ojhOuo1ktJprKbVcKyQ"));
        assert!(!is_valid_track_uri("spotify:local:Artist:Album:Song:210"));
        assert!(!is_valid_track_uri("spotify:track:abc:def"));
        assert!(!is_valid_track_uri("SPOTIFY:TRACK:abc"));
        assert!(!is_valid_track_uri(" spotify:track:abc"));
        assert!(!is_valid_track_uri(""));
    }

    #[test]
    fn filter_drops_missing_and_malformed_entries() {
        let entries = vec![
            None,
            Some("spotify:track:A".to_string()),
            Some("spotify:local:x:y:z:1".to_string()),
            Some("spotify:track:B".to_string()),
            None,
            Some("https://open.spotify.com/track/C".to_string()),
            Some("spotify:track:C".to_string()),
        ];

        assert_eq!(
            filter_track_uris(entries),
            vec!["spotify:track:A", "spotify:track:B", "spotify:track:C"]
        );
    }

    #[test]
    fn filter_of_nothing_valid_is_empty() {
        assert!(filter_track_uris(vec![None, Some("spotify:track:".to_string())]).is_empty());
        assert!(filter_track_uris(Vec::new()).is_empty());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let original: Vec<String> = (0..200).map(|i| format!("spotify:track:t{i}")).collect();
        let mut shuffled = original.clone();
        shuffle_uris(&mut shuffled, &mut StdRng::seed_from_u64(7));

        assert_ne!(shuffled, original);
        let mut sorted = shuffled.clone();
        sorted.sort();
        let mut expected = original.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_seed() {
        let original: Vec<String> = (0..50).map(|i| format!("spotify:track:t{i}")).collect();

        let mut first = original.clone();
        shuffle_uris(&mut first, &mut StdRng::seed_from_u64(42));
        let mut second = original.clone();
        shuffle_uris(&mut second, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_keeps_duplicates() {
        let mut uris = vec![
            "spotify:track:A".to_string(),
            "spotify:track:A".to_string(),
            "spotify:track:B".to_string(),
        ];
        shuffle_uris(&mut uris, &mut StdRng::seed_from_u64(1));
        assert_eq!(uris.iter().filter(|u| u.as_str() == "spotify:track:A").count(), 2);
        assert_eq!(uris.len(), 3);
    }
}
