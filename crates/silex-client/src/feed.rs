//! Public review feed: approved reviews followed by the editorial list.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::api::ReviewsApi;
use crate::review::Review;

/// A review as shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub author: String,
    /// Company and city, or whatever the reviewer gave.
    pub company: String,
    pub text: String,
    /// `None` for editorial entries, which carry no rating.
    pub stars: Option<u8>,
    /// Whether this came from the review service.
    pub live: bool,
}

impl From<Review> for Testimonial {
    fn from(review: Review) -> Self {
        let company = match (review.company.is_empty(), review.role.is_empty()) {
            (false, false) => format!("{}, {}", review.company, review.role),
            (false, true) => review.company,
            (true, _) => review.role,
        };
        Self {
            author: review.author,
            company,
            text: review.text,
            stars: Some(review.stars),
            live: true,
        }
    }
}

const EDITORIAL: [(&str, &str, &str); 5] = [
    (
        "Иван Петров",
        "СтройМастер, Артем",
        "Сэкономили 15% на фундаменте благодаря легкому весу блоков. Качество на высоте!",
    ),
    (
        "Сергей Ковалев",
        "ДомСтрой, Владивосток",
        "Работаем с Силексом уже 3 года. Клиенты довольны теплом и прочностью домов.",
    ),
    (
        "Михаил Соколов",
        "ПримСтрой, Находка",
        "Быстрая кладка и отличная геометрия блоков. Рекомендую всем подрядчикам!",
    ),
    (
        "Андрей Васильев",
        "ЭкоДом, Уссурийск",
        "Экологичный материал, важно для наших клиентов. Морозостойкость отличная.",
    ),
    (
        "Дмитрий Кузнецов",
        "СтройТех, Артем",
        "Оптовые цены очень конкурентные. Доставка всегда вовремя. Гарантия 5 лет!",
    ),
];

/// The fixed testimonials shown on every page load.
#[must_use]
pub fn editorial() -> Vec<Testimonial> {
    EDITORIAL
        .iter()
        .map(|(author, company, text)| Testimonial {
            author: (*author).to_owned(),
            company: (*company).to_owned(),
            text: (*text).to_owned(),
            stars: None,
            live: false,
        })
        .collect()
}

/// Read-only feed for the landing page.
#[derive(Clone)]
pub struct ReviewFeed {
    api: Arc<dyn ReviewsApi>,
}

impl ReviewFeed {
    #[must_use]
    pub fn new(api: Arc<dyn ReviewsApi>) -> Self {
        Self { api }
    }

    /// Approved reviews, newest first, then the editorial list.
    ///
    /// Never fails: if the service cannot be reached only the editorial
    /// list is returned.
    pub async fn load(&self) -> Vec<Testimonial> {
        let live = match self.api.list_public().await {
            Ok(reviews) => reviews,
            Err(e) => {
                debug!(error = %e, "review feed unavailable, showing editorial list only");
                Vec::new()
            }
        };
        live.into_iter()
            .map(Testimonial::from)
            .chain(editorial())
            .collect()
    }
}
