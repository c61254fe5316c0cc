//! # Catalog State
//!
//! The two pieces of shared mutable state the engine owns:
//!
//! - [`records::RecordStore`]: id → [`Episode`](crate::model::Episode), unordered, the
//!   single source of truth for record content and user flags.
//! - [`pagination::PaginationIndex`]: page → ordered ids, plus the aggregate counts of
//!   the latest response and the navigation cursor.
//!
//! A page's display order lives only in the index; the store never orders anything.
//! Both are plain data with no I/O. The [`reconciler`](crate::reconciler) is the only
//! writer in the running application.

pub mod pagination;
pub mod records;

pub use pagination::{PageWindow, PaginationIndex};
pub use records::RecordStore;

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::{Character, CharacterStatus, PageInfo, ServerEpisode};

    pub fn character(id: &str, name: &str, status: CharacterStatus) -> Character {
        Character {
            id: id.to_string(),
            name: name.to_string(),
            status,
            species: "Human".to_string(),
            image: format!("https://example.invalid/avatar/{}.jpeg", id),
        }
    }

    pub fn server_episode(id: &str, name: &str) -> ServerEpisode {
        ServerEpisode {
            id: id.to_string(),
            name: name.to_string(),
            air_date: "December 2, 2013".to_string(),
            code: format!("S01E{:0>2}", id),
            characters: vec![
                character("1", "Rick Sanchez", CharacterStatus::Alive),
                character("2", "Morty Smith", CharacterStatus::Alive),
            ],
        }
    }

    /// Page `page` of a catalog with `per_page` records per page and `total` overall.
    /// Ids are sequential starting at 1.
    pub fn catalog_page(page: u32, per_page: u32, total: u32) -> (Vec<ServerEpisode>, PageInfo) {
        let total_pages = total.div_ceil(per_page).max(1);
        let first = (page - 1) * per_page + 1;
        let last = (page * per_page).min(total);
        let records = (first..=last)
            .map(|n| server_episode(&n.to_string(), &format!("Episode {}", n)))
            .collect();
        let info = PageInfo {
            total_pages,
            total_records: total,
            has_next: page < total_pages,
            has_prev: page > 1,
        };
        (records, info)
    }
}
