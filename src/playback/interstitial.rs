//! Interstitial content
//!
//! Parody pirate advertisements shown between steps at a fixed cadence.
//! The deck remembers the last card it dealt so the same ad never shows
//! twice in a row; that memory lives here, owned by whoever owns the deck,
//! not in module state.

use rand::Rng;

/// Seconds the viewer must wait before an interstitial can be dismissed.
pub const DISMISS_COUNTDOWN_SECS: u64 = 5;

/// One parody ad card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interstitial {
    pub headline: &'static str,
    pub body: &'static str,
    pub cta: &'static str,
    pub icon: &'static str,
    pub accent: &'static str,
    pub tag: &'static str,
    pub fine: &'static str,
}

const DECK: &[Interstitial] = &[
    Interstitial {
        headline: "HOT SINGLE MERMAIDS",
        body: "in yer waters! Only 3 nautical miles away! They be DYING to meet a scallywag like ye!",
        cta: "Meet Mermaids Now",
        icon: "🧜",
        accent: "#e91e8f",
        tag: "SPONSORED",
        fine: "*Mermaids may actually be manatees. Results may vary. Not responsible for shipwrecks.",
    },
    Interstitial {
        headline: "YER SHIP HAS 47 BARNACLES!",
        body: "Download BarnacleBlocker PRO to clean yer hull INSTANTLY! Yer vessel be runnin' 300% slower!",
        cta: "Download FREE Scan",
        icon: "🦠",
        accent: "#ff4444",
        tag: "WARNING",
        fine: "*BarnacleBlocker will install 14 additional toolbars on yer helm.",
    },
    Interstitial {
        headline: "CAPTAIN HOOK HATES HIM!",
        body: "Local pirate discovers ONE WEIRD TRICK to find treasure 10x faster. Treasure hunters FURIOUS!",
        cta: "Learn His Secret",
        icon: "💰",
        accent: "#ff8800",
        tag: "PROMOTED",
        fine: "*This pirate was later arrested for fraud on seven seas.",
    },
    Interstitial {
        headline: "FREE PARROT — CLAIM NOW!",
        body: "Congratulations! Ye be the 1,000,000th pirate to visit this island! Click below to claim yer FREE parrot!",
        cta: "Claim Free Parrot",
        icon: "🦜",
        accent: "#44bb44",
        tag: "WINNER!!",
        fine: "*One parrot per pirate. Parrot may bite. Parrot may reveal location of yer secret treasure.",
    },
    Interstitial {
        headline: "IS YER PEG LEG SLOW?",
        body: "Upgrade to PegLeg PRO — carbon fiber, spring-loaded, with GPS navigation! Now 50% off!",
        cta: "Shop PegLeg PRO",
        icon: "🦿",
        accent: "#6c5ce7",
        tag: "AD",
        fine: "*Side effects include: excessive speed, involuntary jigs, and splinters.",
    },
    Interstitial {
        headline: "EXTEND YER PLANK WARRANTY!",
        body: "We've been tryin' to reach ye about yer plank's extended warranty! It expires in 2 tides!",
        cta: "Call Now — 1-800-PLANK",
        icon: "📞",
        accent: "#0984e3",
        tag: "URGENT",
        fine: "*Plank warranty does not cover walk-the-plank incidents.",
    },
    Interstitial {
        headline: "GROG DELIVERY IN 30 MIN!",
        body: "Order now from GrogDash! Premium rum, ale & hardtack delivered straight to yer ship!",
        cta: "Order Grog Now",
        icon: "🍺",
        accent: "#e17055",
        tag: "NEW",
        fine: "*Minimum order: 12 barrels. Delivery by cannon. Breakage expected.",
    },
    Interstitial {
        headline: "LEARN PIRACY IN 6 WEEKS!",
        body: "PirateBootcamp Online Academy — Get certified in Plundering, Swashbuckling & Sea Shanties!",
        cta: "Enroll FREE Trial",
        icon: "🏴",
        accent: "#fdcb6e",
        tag: "EDUCATION",
        fine: "*Degree not recognized by any navy. 98% of graduates still get caught.",
    },
];

/// Deals interstitial cards, never repeating the previous one.
#[derive(Debug, Default)]
pub struct InterstitialDeck {
    last_shown: Option<usize>,
}

impl InterstitialDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deal the next card.
    pub fn draw(&mut self) -> Interstitial {
        self.draw_with(&mut rand::thread_rng())
    }

    /// Deal with a caller-supplied generator.
    pub fn draw_with<R: Rng>(&mut self, rng: &mut R) -> Interstitial {
        let mut idx = rng.gen_range(0..DECK.len());
        while Some(idx) == self.last_shown && DECK.len() > 1 {
            idx = rng.gen_range(0..DECK.len());
        }
        self.last_shown = Some(idx);
        DECK[idx]
    }

    /// Forget the last-dealt card.
    pub fn reset(&mut self) {
        self.last_shown = None;
    }
}
