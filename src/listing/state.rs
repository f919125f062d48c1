use url::form_urlencoded;

/// Categorical filters a list view may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Status,
    Category,
    Level,
}

/// Everything the user asked to see in a list view.
///
/// Round-trips through the query string so a copied link reproduces
/// the view. Empty strings mean "no constraint".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub status: String,
    pub category: String,
    pub level: String,
    pub date_range: String,
    pub active_tab: String,
    pub sort_by: String,
    pub sort_direction: String,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: String::new(),
            category: String::new(),
            level: String::new(),
            date_range: String::new(),
            active_tab: String::new(),
            sort_by: String::new(),
            sort_direction: String::new(),
            page: 1,
        }
    }
}

impl FilterState {
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn facet(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Status => &self.status,
            Facet::Category => &self.category,
            Facet::Level => &self.level,
        };
        let value = value.trim();
        (!value.is_empty()).then_some(value)
    }

    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        match facet {
            Facet::Status => self.status = value,
            Facet::Category => self.category = value,
            Facet::Level => self.level = value,
        }
        self.page = 1;
    }

    pub fn set_tab(&mut self, tab: impl Into<String>) {
        self.active_tab = tab.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort_by: impl Into<String>, direction: impl Into<String>) {
        self.sort_by = sort_by.into();
        self.sort_direction = direction.into();
        self.page = 1;
    }

    pub fn set_date_range(&mut self, range: impl Into<String>) {
        self.date_range = range.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Encodes the non-default values as a query string.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.string_pairs() {
            if !value.trim().is_empty() {
                out.append_pair(key, value);
            }
        }
        if self.page() > 1 {
            out.append_pair("page", &self.page().to_string());
        }
        out.finish()
    }

    /// Parses a query string produced by [`FilterState::to_query_string`] or
    /// typed by hand. Unknown keys and unparsable pages are ignored.
    pub fn from_query_str(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "search" => state.search = value,
                "status" => state.status = value,
                "category" => state.category = value,
                "level" => state.level = value,
                "when" => state.date_range = value,
                "activeTab" => state.active_tab = value,
                "sortBy" => state.sort_by = value,
                "sortDirection" => state.sort_direction = value,
                "page" => state.page = value.parse().unwrap_or(1).max(1),
                _ => {}
            }
        }
        state
    }

    fn string_pairs(&self) -> [(&'static str, &str); 8] {
        [
            ("search", self.search.as_str()),
            ("status", self.status.as_str()),
            ("category", self.category.as_str()),
            ("level", self.level.as_str()),
            ("when", self.date_range.as_str()),
            ("activeTab", self.active_tab.as_str()),
            ("sortBy", self.sort_by.as_str()),
            ("sortDirection", self.sort_direction.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_change_resets_to_first_page() {
        let mut state = FilterState::default();

        state.set_page(4);
        state.set_search("rust");
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_filter(Facet::Level, "beginner");
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_tab("completed");
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_sort("price_low", "");
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_date_range("this_week");
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn query_string_reproduces_the_view() {
        let mut state = FilterState::default();
        state.set_search("data & design");
        state.set_filter(Facet::Category, "business");
        state.set_tab("active");
        state.set_sort("highest_rated", "desc");
        state.set_page(3);

        let query = state.to_query_string();
        assert!(query.contains("activeTab=active"));
        assert!(query.contains("sortBy=highest_rated"));
        assert_eq!(FilterState::from_query_str(&query), state);
        assert_eq!(FilterState::from_query_str(&format!("?{query}")), state);
    }

    #[test]
    fn default_state_has_empty_query() {
        assert_eq!(FilterState::default().to_query_string(), "");
        assert_eq!(FilterState::from_query_str(""), FilterState::default());
    }

    #[test]
    fn blank_values_are_not_constraints() {
        let mut state = FilterState::default();
        state.set_filter(Facet::Status, "   ");
        state.set_search("  ");
        assert_eq!(state.facet(Facet::Status), None);
        assert_eq!(state.search_term(), None);
    }

    #[test]
    fn garbage_page_falls_back_to_first() {
        let state = FilterState::from_query_str("page=abc&search=x");
        assert_eq!(state.page(), 1);
        assert_eq!(state.search, "x");
    }
}
