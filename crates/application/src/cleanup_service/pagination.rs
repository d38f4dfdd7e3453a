use std::collections::BTreeSet;

use crate::cleanup_ports::ResourcePage;

/// Tracks continuation tokens across one paginated listing.
#[derive(Debug, Default)]
pub(super) struct PageCursor {
    next_token: Option<String>,
    seen_tokens: BTreeSet<String>,
    started: bool,
    exhausted: bool,
    pages: u32,
}

impl PageCursor {
    /// Returns the token for the next request, or `None` once the listing is done.
    pub(super) fn next_request(&mut self) -> Option<Option<String>> {
        if self.exhausted {
            return None;
        }

        if !self.started {
            self.started = true;
            return Some(None);
        }

        Some(self.next_token.take())
    }

    /// Consumes one page and returns its items.
    ///
    /// A missing or blank token ends the listing, as does any token already
    /// handed out earlier in the same listing.
    pub(super) fn accept<T>(&mut self, page: ResourcePage<T>) -> Vec<T> {
        self.pages = self.pages.saturating_add(1);

        let next_token = page
            .next_token
            .filter(|token| !token.trim().is_empty())
            .filter(|token| self.seen_tokens.insert(token.clone()));

        match next_token {
            Some(token) => self.next_token = Some(token),
            None => self.exhausted = true,
        }

        page.items
    }

    /// Pages consumed so far.
    pub(super) fn pages(&self) -> u32 {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use crate::cleanup_ports::ResourcePage;

    use super::PageCursor;

    #[test]
    fn cursor_walks_tokens_until_last_page() {
        let mut cursor = PageCursor::default();

        let first = cursor.next_request();
        assert_eq!(first, Some(None));
        let items = cursor.accept(ResourcePage {
            items: vec![1, 2],
            next_token: Some("page-2".to_owned()),
        });
        assert_eq!(items, vec![1, 2]);

        let second = cursor.next_request();
        assert_eq!(second, Some(Some("page-2".to_owned())));
        let items = cursor.accept(ResourcePage::last(vec![3]));
        assert_eq!(items, vec![3]);

        assert_eq!(cursor.next_request(), None);
        assert_eq!(cursor.pages(), 2);
    }

    #[test]
    fn cursor_stops_on_blank_or_repeated_token() {
        let mut cursor = PageCursor::default();
        assert_eq!(cursor.next_request(), Some(None));
        cursor.accept(ResourcePage::<u8> {
            items: Vec::new(),
            next_token: Some("   ".to_owned()),
        });
        assert_eq!(cursor.next_request(), None);

        let mut cursor = PageCursor::default();
        assert_eq!(cursor.next_request(), Some(None));
        cursor.accept(ResourcePage::<u8> {
            items: Vec::new(),
            next_token: Some("same".to_owned()),
        });
        assert_eq!(cursor.next_request(), Some(Some("same".to_owned())));
        cursor.accept(ResourcePage::<u8> {
            items: Vec::new(),
            next_token: Some("same".to_owned()),
        });
        assert_eq!(cursor.next_request(), None);
    }

    #[test]
    fn cursor_stops_when_tokens_cycle() {
        let mut cursor = PageCursor::default();
        let mut requests = Vec::new();
        let responses = ["a", "b", "a", "b"];

        for token in responses {
            let Some(request) = cursor.next_request() else {
                break;
            };
            requests.push(request);
            cursor.accept(ResourcePage::<u8> {
                items: Vec::new(),
                next_token: Some(token.to_owned()),
            });
        }

        assert_eq!(
            requests,
            vec![None, Some("a".to_owned()), Some("b".to_owned())]
        );
        assert_eq!(cursor.next_request(), None);
        assert_eq!(cursor.pages(), 3);
    }
}
