use crate::{AppConfig, ItemsArgs};
use anyhow::{anyhow, bail, Context as AnyhowContext, Result};
use lecture_dates_annotator::{
    extract_course_id, inject_year_histogram, run_pass, LectureDateDriver, MemoryPage,
    TextBuilder,
};
use lecture_dates_client::CurriculumClient;
use lecture_dates_curriculum::{
    filter_content_items, parse_items_json, sort_descending, CurriculumItem, MonthYearFormatter,
    YearHistogram,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

const FINAL_PASS_REASON: &str = "end of input";

pub(crate) fn course_id(markup: &Path) -> Result<Value> {
    let raw = read(markup)?;
    Ok(json!({ "course_id": extract_course_id(&raw) }))
}

pub(crate) async fn align(rows: &Path, items: &ItemsArgs, config: &AppConfig) -> Result<Value> {
    let (course_id, items) = load_items(items, config).await?;
    let content = filter_content_items(&items);

    let titles: Vec<String> = read(rows)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let mut page = MemoryPage::with_titles(titles);

    let histogram = YearHistogram::from_items(&content);
    inject_year_histogram(&mut page, &TextBuilder, &histogram);
    let report = run_pass(&mut page, &content, &TextBuilder, &MonthYearFormatter, "align");

    Ok(json!({
        "course_id": course_id,
        "report": report,
        "rows": page.rows(),
        "histogram": page.histogram_annotations(),
    }))
}

pub(crate) async fn watch(items: &ItemsArgs, config: &AppConfig) -> Result<Value> {
    let (course_id, items) = load_items(items, config).await?;
    let content: Arc<[CurriculumItem]> = filter_content_items(&items).into();

    let mut memory = MemoryPage::new();
    let mutations = memory.observe();
    let page = Arc::new(Mutex::new(memory));
    let handle = LectureDateDriver::start(
        page.clone(),
        content,
        TextBuilder,
        MonthYearFormatter,
        mutations,
        config.driver,
    );
    let mut reports = handle.subscribe_reports();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let title = line.trim();
        if !title.is_empty() {
            lock(&page)?.push_row(title);
        }
    }

    handle.trigger(FINAL_PASS_REASON).await?;
    let mut passes = 0usize;
    let report = loop {
        match reports.recv().await {
            Ok(report) if report.reason == FINAL_PASS_REASON => break report,
            Ok(_) => passes += 1,
            Err(RecvError::Lagged(skipped)) => passes += usize::try_from(skipped).unwrap_or(0),
            Err(RecvError::Closed) => bail!("annotation driver stopped before the final pass"),
        }
    };
    handle.disconnect().await;
    log::debug!("{passes} debounced pass(es) ran before end of input");

    let page = lock(&page)?;
    Ok(json!({
        "course_id": course_id,
        "report": report,
        "rows": page.rows(),
        "histogram": page.histogram_annotations(),
    }))
}

pub(crate) async fn histogram(items: &ItemsArgs, config: &AppConfig) -> Result<Value> {
    let (course_id, items) = load_items(items, config).await?;
    let histogram = YearHistogram::from_items(&items);
    let years: serde_json::Map<String, Value> = histogram
        .years()
        .map(|(year, count)| (year.to_string(), json!(count)))
        .collect();

    Ok(json!({
        "course_id": course_id,
        "total": histogram.total(),
        "years": years,
    }))
}

/// Curriculum in visual order, plus the course id when it came from the API.
async fn load_items(
    args: &ItemsArgs,
    config: &AppConfig,
) -> Result<(Option<u64>, Vec<CurriculumItem>)> {
    if let Some(path) = &args.items {
        let mut items = parse_items_json(&read(path)?)
            .with_context(|| format!("Invalid curriculum in {}", path.display()))?;
        sort_descending(&mut items);
        return Ok((None, items));
    }

    let course_id = match (args.course_id, &args.page) {
        (Some(id), _) => id,
        (None, Some(page)) => extract_course_id(&read(page)?)
            .with_context(|| format!("No course id in {}", page.display()))?,
        (None, None) => bail!("one of --items, --course-id or --page is required"),
    };
    let client = CurriculumClient::new(config.client.clone())?;
    let items = client
        .fetch_all_items(course_id)
        .await
        .with_context(|| format!("Failed to fetch curriculum for course {course_id}"))?;
    Ok((Some(course_id), items))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn lock(page: &Mutex<MemoryPage>) -> Result<MutexGuard<'_, MemoryPage>> {
    page.lock().map_err(|_| anyhow!("page lock poisoned"))
}
