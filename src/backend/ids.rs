use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_GROUP_LEN: usize = 6;

/// Source of every id, retrieval code and timestamp the backend hands out.
pub trait IdSource: Send {
    fn next_id(&mut self) -> String;
    fn retrieval_code(&mut self) -> String;
    fn now_millis(&mut self) -> i64;
}

/// Production source: wall clock plus a random suffix.
pub struct RandomIds {
    rng: StdRng,
}

impl RandomIds {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        format!("{}-{:08x}", now, self.rng.gen::<u32>())
    }

    fn retrieval_code(&mut self) -> String {
        let first = code_group(&mut self.rng);
        let second = code_group(&mut self.rng);
        format!("SN-{}-{}", first, second)
    }

    fn now_millis(&mut self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

fn code_group<R: Rng>(rng: &mut R) -> String {
    (0..CODE_GROUP_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Deterministic source for tests: ids count up, codes are derived from the
/// counter and the clock advances one second per call.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counter: u64,
    clock: i64,
}

impl SequentialIds {
    pub fn starting_at(clock: i64) -> Self {
        Self { counter: 0, clock }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("id-{}", self.counter)
    }

    fn retrieval_code(&mut self) -> String {
        self.counter += 1;
        format!("SN-{:06}-{:06}", self.counter, self.counter)
    }

    fn now_millis(&mut self) -> i64 {
        self.clock += 1000;
        self.clock
    }
}

#[cfg(test)]
pub fn is_retrieval_code(code: &str) -> bool {
    let parts: Vec<&str> = code.split('-').collect();
    parts.len() == 3
        && parts[0] == "SN"
        && parts[1..].iter().all(|group| {
            group.len() == CODE_GROUP_LEN && group.bytes().all(|b| CODE_ALPHABET.contains(&b))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_codes_are_well_formed() {
        let mut ids = RandomIds::new();
        for _ in 0..200 {
            let code = ids.retrieval_code();
            assert!(is_retrieval_code(&code), "bad code {}", code);
        }
    }

    #[test]
    fn test_random_ids_are_unique() {
        let mut ids = RandomIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::starting_at(0);
        assert_eq!(ids.next_id(), "id-1");
        assert_eq!(ids.retrieval_code(), "SN-000002-000002");
        assert!(is_retrieval_code("SN-000002-000002"));
        assert_eq!(ids.now_millis(), 1000);
        assert_eq!(ids.now_millis(), 2000);
    }

    #[test]
    fn test_code_validation() {
        assert!(!is_retrieval_code("SN-abcdef-ABCDEF"));
        assert!(!is_retrieval_code("SN-ABCDE-ABCDEF"));
        assert!(!is_retrieval_code("RC-ABCDEF-ABCDEF"));
    }
}
