//! Capacity independent card bytes, cached by profile fingerprint
//!
//! Serializing a contact is the only non trivial work done per tap, the capacity decision itself
//! is cheap and is never cached.

use std::{collections::VecDeque, sync::Arc};

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::{contact::ContactError, profile::CardProfile, vcard};

/// vCard and url bytes for one version of a profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct EncodedCard {
    pub fingerprint: String,
    pub vcard: Vec<u8>,
    pub url: Vec<u8>,
}

impl EncodedCard {
    pub fn encode(profile: &CardProfile) -> Result<Self, ContactError> {
        let vcard = vcard::serialize(&profile.contact)?;

        Ok(Self {
            fingerprint: profile.fingerprint(),
            vcard,
            url: profile.card_url.as_bytes().to_vec(),
        })
    }
}

/// Bounded, thread safe cache of [`EncodedCard`]s, the oldest entry is evicted first
#[derive(Debug)]
pub struct CardCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    cards: AHashMap<String, Arc<EncodedCard>>,
    order: VecDeque<String>,
}

impl CardCache {
    /// A capacity of 0 disables caching, every lookup encodes again
    pub fn new(capacity: usize) -> Self {
        Self { capacity, inner: Mutex::new(CacheInner::default()) }
    }

    pub fn from_config() -> Self {
        Self::new(crate::config::current().cache_capacity as usize)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get_or_encode(&self, profile: &CardProfile) -> Result<Arc<EncodedCard>, ContactError> {
        let fingerprint = profile.fingerprint();
        if let Some(card) = self.get(&fingerprint) {
            return Ok(card);
        }

        // encode outside the lock, two racing callers produce identical bytes
        let card = Arc::new(EncodedCard::encode(profile)?);
        self.insert(card.clone());

        Ok(card)
    }

    pub fn get(&self, fingerprint: &str) -> Option<Arc<EncodedCard>> {
        self.inner.lock().cards.get(fingerprint).cloned()
    }

    pub fn insert(&self, card: Arc<EncodedCard>) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.inner.lock();
        if inner.cards.contains_key(&card.fingerprint) {
            return;
        }

        while inner.order.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else { break };
            debug!("evicting encoded card {oldest}");
            inner.cards.remove(&oldest);
        }

        inner.order.push_back(card.fingerprint.clone());
        inner.cards.insert(card.fingerprint.clone(), card);
    }

    /// Drop one entry, returns true if it was cached
    pub fn invalidate(&self, fingerprint: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.cards.remove(fingerprint).is_none() {
            return false;
        }

        inner.order.retain(|cached| cached != fingerprint);
        true
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.cards.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached cards, oldest first
    pub fn cards(&self) -> Vec<Arc<EncodedCard>> {
        let inner = self.inner.lock();
        inner.order.iter().filter_map(|fingerprint| inner.cards.get(fingerprint).cloned()).collect()
    }
}

impl Default for CardCache {
    fn default() -> Self {
        Self::from_config()
    }
}

#[uniffi::export]
fn encode_card(profile: CardProfile) -> Result<EncodedCard, ContactError> {
    EncodedCard::encode(&profile)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        card_url::{CardUrl, ProfileId},
        contact::Contact,
    };

    fn profile(name: &str) -> CardProfile {
        let url = CardUrl::new("tapcard.app", &ProfileId::from("abc123")).unwrap();
        CardProfile::new(Contact::new(name), url)
    }

    #[test]
    fn test_encode_matches_serializer() {
        let profile = profile("Ada Lovelace");
        let card = EncodedCard::encode(&profile).unwrap();

        assert_eq!(card.vcard, vcard::serialize(&profile.contact).unwrap());
        assert_eq!(card.url, b"https://tapcard.app/share/abc123".to_vec());
        assert_eq!(card.fingerprint, profile.fingerprint());
    }

    #[test]
    fn test_encode_rejects_invalid_contact() {
        assert_eq!(EncodedCard::encode(&profile("  ")), Err(ContactError::MissingName));
    }

    #[test]
    fn test_get_or_encode_reuses_entry() {
        let cache = CardCache::new(4);
        let profile = profile("Ada Lovelace");

        let first = cache.get_or_encode(&profile).unwrap();
        let second = cache.get_or_encode(&profile).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_contact_is_a_new_entry() {
        let cache = CardCache::new(4);
        cache.get_or_encode(&profile("Ada Lovelace")).unwrap();
        cache.get_or_encode(&profile("Ada King")).unwrap();

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_oldest_entry_is_evicted() {
        let cache = CardCache::new(2);
        let ada = profile("Ada");
        let grace = profile("Grace");
        let alan = profile("Alan");

        cache.get_or_encode(&ada).unwrap();
        cache.get_or_encode(&grace).unwrap();
        cache.get_or_encode(&alan).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&ada.fingerprint()).is_none());

        let order: Vec<_> = cache.cards().iter().map(|card| card.fingerprint.clone()).collect();
        assert_eq!(order, vec![grace.fingerprint(), alan.fingerprint()]);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = CardCache::new(0);
        let card = cache.get_or_encode(&profile("Ada")).unwrap();

        assert!(!card.vcard.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = CardCache::new(4);
        let ada = profile("Ada");
        cache.get_or_encode(&ada).unwrap();
        cache.get_or_encode(&profile("Grace")).unwrap();

        assert!(cache.invalidate(&ada.fingerprint()));
        assert!(!cache.invalidate(&ada.fingerprint()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cards().len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.cards().is_empty());
    }

    #[test]
    fn test_concurrent_lookups_share_one_entry() {
        let cache = Arc::new(CardCache::new(4));
        let profile = profile("Ada Lovelace");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let profile = profile.clone();
                std::thread::spawn(move || cache.get_or_encode(&profile).unwrap())
            })
            .collect();

        let cards: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
        assert!(cards.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(cache.len(), 1);
    }
}
