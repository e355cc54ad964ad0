//! Fetch answer data and render it as a line chart
//!
//! [`ChartLoader`] only orchestrates. The network, the DOM, timers and the
//! charting library are injected through the [`DataSource`], [`Page`],
//! [`Timer`] and [`ChartBackend`] traits, so the same flow runs in the
//! browser and under native tests.
//!
//! Failures never escape as panics or exceptions: each one is shown as an
//! inline notice on the wrapper element and then returned for the caller to
//! inspect (or ignore).

use std::cell::RefCell;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::chart::LineChartSpec;
use crate::config::{ChartOptions, LoaderConfig};
use crate::error::{Error, Result};
use crate::messages::{self, Notice};
use crate::payload::SeriesPayload;
use crate::registry::ChartRegistry;
use crate::theme::Theme;

/// Status and body text of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues the GET request for an answer's data.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    /// Resolve with any HTTP status; only transport failures are errors.
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// The document the chart lives in.
pub trait Page {
    /// Caller-owned element that receives notices
    type Wrapper;
    type Canvas;

    fn find_canvas(&self, canvas_id: &str) -> Option<Self::Canvas>;
    fn append_notice(&self, wrapper: &Self::Wrapper, notice: &Notice);
    /// Remove an element by id; missing elements are ignored.
    fn remove_element(&self, element_id: &str);
    /// Set the text of a diagnostics element, if the page has one.
    fn set_debug_log(&self, element_id: &str, text: &str);
    fn has_root_class(&self, class: &str) -> bool;
    /// Full container width, fixed display height.
    fn size_canvas(&self, canvas: &Self::Canvas, height_px: u32);
}

#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
    /// Resolve on the next rendering frame.
    async fn next_frame(&self);
}

/// A charting library able to draw a [`LineChartSpec`] on a canvas.
pub trait ChartBackend<C> {
    type Handle;

    /// Name shown when the library is missing
    fn library(&self) -> &str;
    fn is_available(&self) -> bool;
    fn render(&self, canvas: &C, spec: &LineChartSpec) -> Result<Self::Handle>;
    fn destroy(&self, handle: Self::Handle) -> Result<()>;
}

/// Removes the "started" marker when dropped, whatever the outcome.
struct StartedMarker<'a, P: Page> {
    page: &'a P,
    id: String,
}

impl<P: Page> Drop for StartedMarker<'_, P> {
    fn drop(&mut self) {
        self.page.remove_element(&self.id);
    }
}

pub struct ChartLoader<S, P, T, B>
where
    P: Page,
    B: ChartBackend<P::Canvas>,
{
    source: S,
    page: P,
    timer: T,
    backend: B,
    config: RefCell<LoaderConfig>,
    charts: RefCell<ChartRegistry<B::Handle>>,
}

impl<S, P, T, B> ChartLoader<S, P, T, B>
where
    S: DataSource,
    P: Page,
    T: Timer,
    B: ChartBackend<P::Canvas>,
{
    pub fn new(source: S, page: P, timer: T, backend: B, config: LoaderConfig) -> Self {
        Self {
            source,
            page,
            timer,
            backend,
            config: RefCell::new(config),
            charts: RefCell::new(ChartRegistry::new()),
        }
    }

    pub fn config(&self) -> LoaderConfig {
        self.config.borrow().clone()
    }

    /// Replace the configuration; registered charts are kept.
    pub fn reconfigure(&self, config: LoaderConfig) {
        *self.config.borrow_mut() = config;
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn has_chart(&self, canvas_id: &str) -> bool {
        self.charts.borrow().contains(canvas_id)
    }

    pub fn chart_count(&self) -> usize {
        self.charts.borrow().count()
    }

    /// Fetch the series for `answer_id` and draw it on canvas `canvas_id`.
    ///
    /// Any failure has already been appended to `wrapper` when this returns
    /// `Err`; the returned error is informational.
    pub async fn fetch_and_render(
        &self,
        answer_id: &str,
        canvas_id: &str,
        wrapper: &P::Wrapper,
        options: &ChartOptions,
    ) -> Result<()> {
        let config = self.config();
        debug!(answer_id, canvas_id, "fetch_and_render start");

        let _marker = self.show_started(&config, canvas_id, wrapper);
        self.page
            .set_debug_log(&config.debug_log_id, &messages::loading(answer_id));

        let result = self
            .load_and_render(&config, answer_id, canvas_id, options)
            .await;

        if let Err(ref e) = result {
            error!(answer_id, canvas_id, "fetch_and_render error: {}", e);
            self.page.append_notice(wrapper, &e.notice());
        }

        result
    }

    fn show_started(
        &self,
        config: &LoaderConfig,
        canvas_id: &str,
        wrapper: &P::Wrapper,
    ) -> StartedMarker<'_, P> {
        let id = config.started_marker_id(canvas_id);
        self.page.append_notice(wrapper, &Notice::started(id.clone()));
        StartedMarker {
            page: &self.page,
            id,
        }
    }

    async fn load_and_render(
        &self,
        config: &LoaderConfig,
        answer_id: &str,
        canvas_id: &str,
        options: &ChartOptions,
    ) -> Result<()> {
        let payload = self.fetch_payload(config, answer_id).await?;
        debug!(answer_id, points = payload.len(), "chart data received");
        self.page
            .set_debug_log(&config.debug_log_id, &messages::received(answer_id));

        let canvas = self.wait_for_canvas(config, canvas_id).await?;

        // let layout settle before reading the container size
        self.timer.next_frame().await;
        self.page.size_canvas(&canvas, config.canvas_height);

        if !self.backend.is_available() {
            return Err(Error::LibraryUnavailable {
                library: self.backend.library().to_string(),
            });
        }

        let theme = Theme::from_dark(self.page.has_root_class(&config.dark_class));
        let spec = LineChartSpec::build(&payload, options, theme, config.canvas_height);
        self.replace_chart(canvas_id, &canvas, &spec)?;

        self.page
            .set_debug_log(&config.debug_log_id, &messages::received(answer_id));
        info!(answer_id, canvas_id, "chart rendered");
        Ok(())
    }

    async fn fetch_payload(&self, config: &LoaderConfig, answer_id: &str) -> Result<SeriesPayload> {
        let url = config.url_for(answer_id);
        let response = self.source.fetch(&url).await?;

        if !response.is_success() {
            return Err(Error::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        SeriesPayload::from_json(&response.body)
    }

    /// One immediate lookup, then up to `poll_attempts` retries.
    async fn wait_for_canvas(&self, config: &LoaderConfig, canvas_id: &str) -> Result<P::Canvas> {
        let mut canvas = self.page.find_canvas(canvas_id);
        let mut attempts = 0;

        while canvas.is_none() && attempts < config.poll_attempts {
            self.timer.sleep(config.poll_interval()).await;
            canvas = self.page.find_canvas(canvas_id);
            attempts += 1;
        }

        canvas.ok_or_else(|| Error::CanvasNotFound {
            canvas_id: canvas_id.to_string(),
        })
    }

    /// Destroy, render and register without a suspension point in between,
    /// so interleaved calls on one canvas leave exactly one live chart.
    fn replace_chart(&self, canvas_id: &str, canvas: &P::Canvas, spec: &LineChartSpec) -> Result<()> {
        let mut charts = self.charts.borrow_mut();

        if let Some(previous) = charts.take(canvas_id) {
            if let Err(e) = self.backend.destroy(previous) {
                debug!(canvas_id, "ignoring destroy error: {}", e);
            }
        }

        let handle = self.backend.render(canvas, spec).map_err(|e| match e {
            Error::Render(_) => e,
            other => Error::Render(other.to_string()),
        })?;
        charts.insert(canvas_id, handle);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{ERROR_CLASS, RENDER_ERROR_CLASS, STARTED_TEXT};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::collections::{HashMap, HashSet};

    struct FakeSource {
        responses: HashMap<String, FetchResponse>,
    }

    impl FakeSource {
        fn with(url: &str, status: u16, body: &str) -> Self {
            let mut responses = HashMap::new();
            responses.insert(
                url.to_string(),
                FetchResponse {
                    status,
                    body: body.to_string(),
                },
            );
            Self { responses }
        }
    }

    impl DataSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<FetchResponse> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Network("Failed to fetch".to_string()))
        }
    }

    #[derive(Default)]
    struct FakePage {
        canvases: RefCell<HashSet<String>>,
        /// canvas id -> lookups that miss before it shows up
        late_canvases: RefCell<HashMap<String, u32>>,
        notices: RefCell<Vec<Notice>>,
        debug_log: RefCell<Option<String>>,
        sized: RefCell<Vec<(String, u32)>>,
        dark: bool,
    }

    impl FakePage {
        fn with_canvas(id: &str) -> Self {
            let page = Self::default();
            page.canvases.borrow_mut().insert(id.to_string());
            page
        }

        fn errors(&self) -> Vec<Notice> {
            self.notices
                .borrow()
                .iter()
                .filter(|n| n.is_error())
                .cloned()
                .collect()
        }

        fn has_started_marker(&self) -> bool {
            self.notices.borrow().iter().any(|n| n.text == STARTED_TEXT)
        }
    }

    impl Page for FakePage {
        type Wrapper = ();
        type Canvas = String;

        fn find_canvas(&self, canvas_id: &str) -> Option<String> {
            if let Some(misses) = self.late_canvases.borrow_mut().get_mut(canvas_id) {
                if *misses > 0 {
                    *misses -= 1;
                    return None;
                }
                return Some(canvas_id.to_string());
            }
            self.canvases.borrow().get(canvas_id).cloned()
        }

        fn append_notice(&self, _wrapper: &(), notice: &Notice) {
            self.notices.borrow_mut().push(notice.clone());
        }

        fn remove_element(&self, element_id: &str) {
            self.notices
                .borrow_mut()
                .retain(|n| n.id.as_deref() != Some(element_id));
        }

        fn set_debug_log(&self, _element_id: &str, text: &str) {
            *self.debug_log.borrow_mut() = Some(text.to_string());
        }

        fn has_root_class(&self, class: &str) -> bool {
            self.dark && class == "dark"
        }

        fn size_canvas(&self, canvas: &String, height_px: u32) {
            self.sized.borrow_mut().push((canvas.clone(), height_px));
        }
    }

    /// Yields to the executor instead of waiting so tests stay instant.
    #[derive(Default)]
    struct FakeTimer {
        sleeps: Cell<u32>,
        frames: Cell<u32>,
    }

    impl Timer for FakeTimer {
        async fn sleep(&self, _duration: Duration) {
            self.sleeps.set(self.sleeps.get() + 1);
            tokio::task::yield_now().await;
        }

        async fn next_frame(&self) {
            self.frames.set(self.frames.get() + 1);
            tokio::task::yield_now().await;
        }
    }

    struct FakeBackend {
        available: bool,
        fail_with: Option<String>,
        fail_destroy: bool,
        next_id: Cell<u32>,
        rendered: RefCell<Vec<LineChartSpec>>,
        destroyed: RefCell<Vec<u32>>,
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self {
                available: true,
                fail_with: None,
                fail_destroy: false,
                next_id: Cell::new(1),
                rendered: RefCell::new(Vec::new()),
                destroyed: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChartBackend<String> for FakeBackend {
        type Handle = u32;

        fn library(&self) -> &str {
            "Chart.js"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn render(&self, _canvas: &String, spec: &LineChartSpec) -> Result<u32> {
            if let Some(ref msg) = self.fail_with {
                return Err(Error::Render(msg.clone()));
            }
            self.rendered.borrow_mut().push(spec.clone());
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            Ok(id)
        }

        fn destroy(&self, handle: u32) -> Result<()> {
            self.destroyed.borrow_mut().push(handle);
            if self.fail_destroy {
                return Err(Error::Render("chart already detached".to_string()));
            }
            Ok(())
        }
    }

    type TestLoader = ChartLoader<FakeSource, FakePage, FakeTimer, FakeBackend>;

    const URL: &str = "/api/answer-data/7";
    const BODY: &str = r#"{"x": [1, 2, 3], "y": [10, 20, 15]}"#;

    fn loader(source: FakeSource, page: FakePage, backend: FakeBackend) -> TestLoader {
        ChartLoader::new(source, page, FakeTimer::default(), backend, LoaderConfig::default())
    }

    #[tokio::test]
    async fn test_successful_render() {
        let loader = loader(
            FakeSource::with(URL, 200, BODY),
            FakePage::with_canvas("chart-7"),
            FakeBackend::default(),
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(result.is_ok());
        assert!(loader.page().errors().is_empty());
        assert!(!loader.page().has_started_marker());
        assert!(loader.has_chart("chart-7"));

        let rendered = loader.backend().rendered.borrow();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].labels, vec!["1", "2", "3"]);
        assert_eq!(rendered[0].values, vec![Some(10.0), Some(20.0), Some(15.0)]);
        assert_eq!(
            *loader.page().sized.borrow(),
            vec![("chart-7".to_string(), 260)]
        );
        assert_eq!(loader.timer.frames.get(), 1);
        assert_eq!(
            loader.page().debug_log.borrow().as_deref(),
            Some("Données reçues pour id 7")
        );
    }

    #[tokio::test]
    async fn test_http_error_shows_status_and_body() {
        let loader = loader(
            FakeSource::with(URL, 500, "Internal Server Error"),
            FakePage::with_canvas("chart-7"),
            FakeBackend::default(),
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
        let errors = loader.page().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].text,
            "Impossible de charger le graphique (status 500) Internal Server Error"
        );
        assert_eq!(errors[0].class, ERROR_CLASS);
        assert!(!loader.has_chart("chart-7"));
        assert!(!loader.page().has_started_marker());
    }

    #[tokio::test]
    async fn test_network_failure() {
        let loader = loader(
            FakeSource::with("/elsewhere", 200, BODY),
            FakePage::with_canvas("chart-7"),
            FakeBackend::default(),
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(
            loader.page().errors()[0].text,
            "Erreur lors du chargement du graphique: Failed to fetch"
        );
        assert!(!loader.page().has_started_marker());
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_load_error() {
        let loader = loader(
            FakeSource::with(URL, 200, "not json"),
            FakePage::with_canvas("chart-7"),
            FakeBackend::default(),
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(matches!(result, Err(Error::Parse(_))));
        assert!(loader.page().errors()[0]
            .text
            .starts_with("Erreur lors du chargement du graphique: "));
    }

    #[tokio::test]
    async fn test_missing_canvas_gives_up_after_polling() {
        let loader = loader(
            FakeSource::with(URL, 200, BODY),
            FakePage::default(),
            FakeBackend::default(),
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(matches!(result, Err(Error::CanvasNotFound { .. })));
        assert_eq!(loader.timer.sleeps.get(), 10);
        assert_eq!(
            loader.page().errors()[0].text,
            "Canvas introuvable pour le graphique"
        );
        assert!(loader.backend().rendered.borrow().is_empty());
        assert!(!loader.page().has_started_marker());
    }

    #[tokio::test]
    async fn test_late_canvas_is_found() {
        let page = FakePage::default();
        page.late_canvases.borrow_mut().insert("chart-7".to_string(), 3);
        let loader = loader(FakeSource::with(URL, 200, BODY), page, FakeBackend::default());

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(result.is_ok());
        assert_eq!(loader.timer.sleeps.get(), 3);
        assert!(loader.has_chart("chart-7"));
    }

    #[tokio::test]
    async fn test_missing_library_names_it() {
        let backend = FakeBackend {
            available: false,
            ..Default::default()
        };
        let loader = loader(
            FakeSource::with(URL, 200, BODY),
            FakePage::with_canvas("chart-7"),
            backend,
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(matches!(result, Err(Error::LibraryUnavailable { .. })));
        assert_eq!(loader.page().errors()[0].text, "Chart.js non chargé");
        assert!(!loader.has_chart("chart-7"));
        assert!(!loader.page().has_started_marker());
    }

    #[tokio::test]
    async fn test_render_failure_is_reported_inline() {
        let backend = FakeBackend {
            fail_with: Some("context lost".to_string()),
            ..Default::default()
        };
        let loader = loader(
            FakeSource::with(URL, 200, BODY),
            FakePage::with_canvas("chart-7"),
            backend,
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(matches!(result, Err(Error::Render(_))));
        let errors = loader.page().errors();
        assert_eq!(
            errors[0].text,
            "Erreur lors du rendu du graphique: context lost"
        );
        assert_eq!(errors[0].class, RENDER_ERROR_CLASS);
        assert!(!loader.has_chart("chart-7"));
    }

    #[tokio::test]
    async fn test_second_render_destroys_first() {
        let loader = loader(
            FakeSource::with(URL, 200, BODY),
            FakePage::with_canvas("chart-7"),
            FakeBackend::default(),
        );
        let options = ChartOptions::default();

        loader.fetch_and_render("7", "chart-7", &(), &options).await.unwrap();
        loader.fetch_and_render("7", "chart-7", &(), &options).await.unwrap();

        assert_eq!(*loader.backend().destroyed.borrow(), vec![1]);
        assert_eq!(loader.chart_count(), 1);
        assert_eq!(loader.charts.borrow().get("chart-7"), Some(&2));
    }

    #[tokio::test]
    async fn test_destroy_failure_does_not_block_render() {
        let backend = FakeBackend {
            fail_destroy: true,
            ..Default::default()
        };
        let loader = loader(
            FakeSource::with(URL, 200, BODY),
            FakePage::with_canvas("chart-7"),
            backend,
        );
        let options = ChartOptions::default();

        loader.fetch_and_render("7", "chart-7", &(), &options).await.unwrap();
        let second = loader.fetch_and_render("7", "chart-7", &(), &options).await;

        assert!(second.is_ok());
        assert!(loader.page().errors().is_empty());
        assert_eq!(*loader.backend().destroyed.borrow(), vec![1]);
        assert_eq!(loader.chart_count(), 1);
        assert_eq!(loader.charts.borrow().get("chart-7"), Some(&2));
    }

    #[tokio::test]
    async fn test_null_series_draws_empty_chart() {
        let loader = loader(
            FakeSource::with(URL, 200, r#"{"x": null, "y": null}"#),
            FakePage::with_canvas("chart-7"),
            FakeBackend::default(),
        );

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(result.is_ok());
        assert!(loader.page().errors().is_empty());
        assert!(loader.has_chart("chart-7"));
        let rendered = loader.backend().rendered.borrow();
        assert!(rendered[0].labels.is_empty());
        assert!(rendered[0].values.is_empty());
    }

    #[tokio::test]
    async fn test_interleaved_calls_keep_one_chart() {
        let page = FakePage::default();
        page.late_canvases.borrow_mut().insert("chart-7".to_string(), 2);
        let loader = loader(FakeSource::with(URL, 200, BODY), page, FakeBackend::default());
        let options = ChartOptions::default();

        let (first, second) = tokio::join!(
            loader.fetch_and_render("7", "chart-7", &(), &options),
            loader.fetch_and_render("7", "chart-7", &(), &options),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(loader.chart_count(), 1);
        assert_eq!(loader.backend().destroyed.borrow().len(), 1);
        assert!(!loader.page().has_started_marker());
    }

    #[tokio::test]
    async fn test_dark_mode_and_axis_titles() {
        let mut page = FakePage::with_canvas("chart-7");
        page.dark = true;
        let loader = loader(FakeSource::with(URL, 200, BODY), page, FakeBackend::default());
        let options = ChartOptions {
            x_label: Some("Tours".to_string()),
            y_label: None,
        };

        loader
            .fetch_and_render("7", "chart-7", &(), &options)
            .await
            .unwrap();

        let rendered = loader.backend().rendered.borrow();
        assert_eq!(rendered[0].theme, Theme::Dark);
        assert_eq!(rendered[0].x_axis.title, "Tours");
        assert_eq!(rendered[0].y_axis.title, messages::DEFAULT_Y_LABEL);
    }

    #[tokio::test]
    async fn test_reconfigured_endpoint() {
        let loader = loader(
            FakeSource::with("/series/7.json", 200, BODY),
            FakePage::with_canvas("chart-7"),
            FakeBackend::default(),
        );
        loader.reconfigure(LoaderConfig {
            endpoint: "/series/{answer_id}.json".to_string(),
            ..Default::default()
        });

        let result = loader
            .fetch_and_render("7", "chart-7", &(), &ChartOptions::default())
            .await;

        assert!(result.is_ok());
    }
}
