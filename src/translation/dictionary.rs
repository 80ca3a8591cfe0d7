// ABOUTME: Static Russian to English phrase dictionary for provider search terms
// ABOUTME: Exact lookup on the normalized dish title
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

use std::collections::HashMap;
use std::sync::Arc;

const BUILTIN_PHRASES: &[(&str, &[&str])] = &[
    ("куриная грудка", &["chicken breast", "chicken breast skinless"]),
    ("грудка куриная", &["chicken breast", "chicken breast skinless"]),
    ("курица", &["chicken", "chicken meat"]),
    ("куриное бедро", &["chicken thigh"]),
    ("индейка", &["turkey", "turkey breast"]),
    ("говядина", &["beef", "lean beef"]),
    ("свинина", &["pork"]),
    ("фарш", &["ground beef", "minced meat"]),
    ("лосось", &["salmon", "atlantic salmon"]),
    ("семга", &["salmon"]),
    ("тунец", &["tuna"]),
    ("треска", &["cod"]),
    ("минтай", &["pollock"]),
    ("креветки", &["shrimp"]),
    ("яйцо", &["egg", "whole egg"]),
    ("яйца", &["egg", "whole egg"]),
    ("гречка", &["buckwheat", "buckwheat groats"]),
    ("рис", &["rice", "white rice"]),
    ("бурый рис", &["brown rice"]),
    ("овсянка", &["oatmeal", "rolled oats"]),
    ("овсяная каша", &["oatmeal"]),
    ("макароны", &["pasta", "spaghetti"]),
    ("булгур", &["bulgur"]),
    ("чечевица", &["lentils"]),
    ("фасоль", &["beans", "kidney beans"]),
    ("картофель", &["potato", "potatoes"]),
    ("картошка", &["potato", "potatoes"]),
    ("хлеб", &["bread", "wheat bread"]),
    ("творог", &["cottage cheese"]),
    ("сыр", &["cheese"]),
    ("молоко", &["milk"]),
    ("кефир", &["kefir"]),
    ("сметана", &["sour cream"]),
    ("йогурт", &["yogurt"]),
    ("йогурт натуральный", &["plain yogurt", "natural yogurt"]),
    ("сливочное масло", &["butter"]),
    ("оливковое масло", &["olive oil"]),
    ("банан", &["banana"]),
    ("яблоко", &["apple"]),
    ("апельсин", &["orange"]),
    ("авокадо", &["avocado"]),
    ("брокколи", &["broccoli"]),
    ("морковь", &["carrot"]),
    ("огурец", &["cucumber"]),
    ("помидор", &["tomato"]),
    ("капуста", &["cabbage"]),
    ("миндаль", &["almonds"]),
    ("грецкий орех", &["walnuts"]),
    ("шоколад", &["chocolate", "dark chocolate"]),
    ("батончик", &["snack bar"]),
    ("протеиновый батончик", &["protein bar"]),
    ("пельмени", &["pelmeni", "meat dumplings"]),
    ("борщ", &["borscht"]),
];

/// Exact-match phrase table from a normalized native title to English keywords
#[derive(Debug, Clone, Default)]
pub struct PhraseDictionary {
    phrases: Arc<HashMap<String, Vec<String>>>,
}

impl PhraseDictionary {
    /// Dictionary with the built-in phrase table
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_PHRASES
                .iter()
                .map(|(phrase, terms)| (*phrase, terms.iter().map(|t| (*t).to_owned()).collect())),
        )
    }

    /// Dictionary from arbitrary entries; later duplicates replace earlier ones
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Vec<String>)>,
    {
        let phrases = entries
            .into_iter()
            .map(|(phrase, terms)| (normalize_phrase(phrase), terms))
            .collect();
        Self {
            phrases: Arc::new(phrases),
        }
    }

    /// English keywords for `title`, empty when unknown
    #[must_use]
    pub fn lookup(&self, title: &str) -> Vec<String> {
        self.phrases
            .get(&normalize_phrase(title))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of phrases
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// True when the dictionary holds no phrases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace('ё', "е")
}
