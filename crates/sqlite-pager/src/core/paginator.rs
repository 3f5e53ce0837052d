use crate::{
    core::{
        calculator::{check_request, PageCalculator, PagePlan},
        limits::{PageBounds, PagerOptions},
        query::RawQuery,
        types::{Page, PageRequest, Window},
    },
    error::{AppError, AppResult},
};

/// Structured collaborator: knows its own filter criteria and can count and
/// slice the rows that match them.
pub trait PageSource {
    type Item;
    type Error: std::error::Error + Send + Sync + 'static;

    fn count(&self) -> Result<u64, Self::Error>;

    fn fetch(&self, window: Window) -> Result<Vec<Self::Item>, Self::Error>;
}

/// Raw collaborator: runs SQL templates with positional parameters.
pub trait RawExecutor {
    type Row;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs a query producing a single non-negative integer.
    fn scalar(&self, query: &RawQuery) -> Result<u64, Self::Error>;

    fn rows(&self, query: &RawQuery) -> Result<Vec<Self::Row>, Self::Error>;
}

/// Holds page size bounds; data sources are passed per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pager {
    bounds: PageBounds,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PagerOptions) -> Self {
        Self {
            bounds: options.into(),
        }
    }

    pub fn bounds(&self) -> PageBounds {
        self.bounds
    }

    pub fn select_page<S: PageSource>(
        &self,
        source: &S,
        request: PageRequest,
    ) -> AppResult<Page<S::Item>> {
        check_request(request)?;
        let total_entries = source.count().map_err(AppError::data_source)?;
        tracing::debug!(total_entries, "counted entries");

        let plan = self.plan(request, total_entries)?;
        let window = plan.window();
        tracing::debug!(offset = window.offset, limit = window.limit, "fetching page");

        let data = source.fetch(window).map_err(AppError::data_source)?;
        Ok(plan.finalize(data))
    }

    /// Same contract as [`Pager::select_page`], for hand-written SQL. The
    /// limit/offset clause is added to `rows_query` here; callers must not
    /// include one.
    pub fn select_page_raw<E: RawExecutor>(
        &self,
        executor: &E,
        count_query: &RawQuery,
        rows_query: &RawQuery,
        request: PageRequest,
    ) -> AppResult<Page<E::Row>> {
        check_request(request)?;
        let total_entries = executor
            .scalar(count_query)
            .map_err(AppError::data_source)?;
        tracing::debug!(total_entries, "counted entries (raw)");

        let plan = self.plan(request, total_entries)?;
        let bounded = rows_query.paged(plan.window());
        tracing::debug!(sql = %bounded.sql(), "fetching page (raw)");

        let data = executor.rows(&bounded).map_err(AppError::data_source)?;
        Ok(plan.finalize(data))
    }

    fn plan(&self, request: PageRequest, total_entries: u64) -> AppResult<PagePlan> {
        PageCalculator::new(self.bounds)
            .plan(request, total_entries)
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    current_page = request.current_page,
                    page_size = request.page_size,
                    "page request rejected"
                )
            })
    }
}
