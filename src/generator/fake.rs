//! Seeded fake-field source.
//!
//! Wraps the `fake` crate behind a deterministic RNG so two runs with the
//! same seed produce the same script. Quote characters are not stripped
//! here; sanitization happens once, in value rendering.

use chrono::{Datelike, Days, NaiveDate};
use fake::faker::address::en::{CityName, StateName, StreetName, ZipCode};
use fake::faker::company::en::{Buzzword, BuzzwordMiddle, BuzzwordTail};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::Rng;

pub struct FieldSource<R: Rng> {
    rng: R,
}

impl<R: Rng> FieldSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn person_name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    /// Single-line street address.
    pub fn address(&mut self) -> String {
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        let number: u32 = self.rng.random_range(1..9999);
        let city: String = CityName().fake_with_rng(&mut self.rng);
        let state: String = StateName().fake_with_rng(&mut self.rng);
        let zip: String = ZipCode().fake_with_rng(&mut self.rng);
        format!("{} {}, {}, {} {}", number, street, city, state, zip)
    }

    pub fn email(&mut self) -> String {
        SafeEmail().fake_with_rng(&mut self.rng)
    }

    /// Catch-phrase style project name.
    pub fn project_name(&mut self) -> String {
        let head: String = Buzzword().fake_with_rng(&mut self.rng);
        let middle: String = BuzzwordMiddle().fake_with_rng(&mut self.rng);
        let tail: String = BuzzwordTail().fake_with_rng(&mut self.rng);
        format!("{} {} {}", head, middle, tail)
    }

    pub fn word(&mut self) -> String {
        let word: String = Word().fake_with_rng(&mut self.rng);
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => word,
        }
    }

    /// A contact number of 10 to 12 digits.
    pub fn phone_digits(&mut self) -> String {
        let len = self.rng.random_range(10..=12);
        (0..len)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10u8)))
            .collect()
    }

    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    pub fn pick<'a>(&mut self, items: &'a [String]) -> &'a str {
        &items[self.rng.random_range(0..items.len())]
    }

    /// Weighted choice; weights are relative and must match `items` in length.
    pub fn pick_weighted<'a>(&mut self, items: &'a [String], weights: &[u32]) -> &'a str {
        debug_assert_eq!(items.len(), weights.len());
        let total: u32 = weights.iter().sum();
        let mut roll = self.rng.random_range(0..total.max(1));
        for (item, &w) in items.iter().zip(weights) {
            if roll < w {
                return item;
            }
            roll -= w;
        }
        &items[items.len() - 1]
    }

    /// Uniform date in the inclusive range.
    pub fn date_between(&mut self, from: NaiveDate, to: NaiveDate) -> NaiveDate {
        let span = (to - from).num_days().max(0) as u64;
        let offset = self.rng.random_range(0..=span);
        from.checked_add_days(Days::new(offset)).unwrap_or(to)
    }

    /// Birth date consistent with `age` full years as of `today`.
    pub fn date_of_birth(&mut self, age: i64, today: NaiveDate) -> NaiveDate {
        let year = today.year() - age as i32;
        let month = self.rng.random_range(1..=12u32);
        // Day capped at 28 so every month is valid.
        let day = self.rng.random_range(1..=28u32);
        NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, 1, 1))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn source(seed: u64) -> FieldSource<ChaCha8Rng> {
        FieldSource::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_same_seed_same_values() {
        let mut a = source(42);
        let mut b = source(42);
        assert_eq!(a.person_name(), b.person_name());
        assert_eq!(a.address(), b.address());
        assert_eq!(a.project_name(), b.project_name());
        assert_eq!(a.int_range(1, 100), b.int_range(1, 100));
    }

    #[test]
    fn test_phone_digits_shape() {
        let mut f = source(7);
        for _ in 0..50 {
            let phone = f.phone_digits();
            assert!((10..=12).contains(&phone.len()));
            assert!(phone.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_date_between_bounds() {
        let mut f = source(7);
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        for _ in 0..100 {
            let d = f.date_between(from, to);
            assert!(d >= from && d <= to);
        }
    }

    #[test]
    fn test_pick_weighted_respects_zero_weight() {
        let mut f = source(9);
        let items = vec!["a".to_string(), "b".to_string()];
        let weights = [0, 5];
        for _ in 0..50 {
            assert_eq!(f.pick_weighted(&items, &weights), "b");
        }
    }

    #[test]
    fn test_date_of_birth_year() {
        let mut f = source(3);
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let dob = f.date_of_birth(30, today);
        assert_eq!(dob.year(), 1994);
    }
}
