//! Test runner: projects, workers, retries and result collection

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use saucedemo_common::{ScreenshotMode, SuiteConfig, TraceMode};

use crate::auth;
use crate::browser::{BrowserLauncher, ContextOptions, PageFactory};
use crate::error::{E2eError, E2eResult};
use crate::fixture::{Attachment, TestContext, TestInfo};
use crate::report::Reporter;
use crate::request::ApiRequest;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Test body or hook
pub type TestFn =
    Arc<dyn for<'a> Fn(&'a TestContext) -> BoxFuture<'a, E2eResult<()>> + Send + Sync>;

/// Whether a test body is expected to pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Pass,
    /// Known failure: a failing body counts as passed, a passing one fails
    Fail,
}

#[derive(Clone)]
pub struct TestCase {
    pub title: String,
    pub tags: Vec<String>,
    pub expectation: Expectation,
    pub only: bool,
    body: TestFn,
}

impl TestCase {
    /// Tags are picked up from `@word` tokens in the title
    pub fn new<F>(title: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a TestContext) -> BoxFuture<'a, E2eResult<()>> + Send + Sync + 'static,
    {
        let title = title.into();
        let tags = parse_tags(&title);
        Self {
            title,
            tags,
            expectation: Expectation::Pass,
            only: false,
            body: Arc::new(body),
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        let tag = if tag.starts_with('@') {
            tag.to_string()
        } else {
            format!("@{}", tag)
        };
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Mark the test as a known failure
    pub fn expect_failure(mut self) -> Self {
        self.expectation = Expectation::Fail;
        self
    }

    /// Focus the run on this test
    pub fn only(mut self) -> Self {
        self.only = true;
        self
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("title", &self.title)
            .field("tags", &self.tags)
            .field("expectation", &self.expectation)
            .field("only", &self.only)
            .finish()
    }
}

fn parse_tags(title: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in title.split_whitespace() {
        if word.len() > 1 && word.starts_with('@') && !tags.iter().any(|t| t == word) {
            tags.push(word.to_string());
        }
    }
    tags
}

/// A named group of tests sharing before-each hooks
#[derive(Clone, Default)]
pub struct Suite {
    pub name: String,
    before_each: Vec<TestFn>,
    pub tests: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn before_each<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a TestContext) -> BoxFuture<'a, E2eResult<()>> + Send + Sync + 'static,
    {
        self.before_each.push(Arc::new(hook));
        self
    }

    pub fn test(mut self, case: TestCase) -> Self {
        self.tests.push(case);
        self
    }

    pub fn tests(mut self, cases: impl IntoIterator<Item = TestCase>) -> Self {
        self.tests.extend(cases);
        self
    }
}

/// A set of suites sharing browser settings
#[derive(Clone)]
pub struct Project {
    pub name: String,
    pub suites: Vec<Suite>,

    /// Saved session every context starts from
    pub storage_state: Option<PathBuf>,

    /// Projects that must pass before this one runs
    pub dependencies: Vec<String>,

    /// Whether tests get a browser page
    pub browser: bool,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suites: Vec::new(),
            storage_state: None,
            dependencies: Vec::new(),
            browser: true,
        }
    }

    pub fn suite(mut self, suite: Suite) -> Self {
        self.suites.push(suite);
        self
    }

    pub fn storage_state(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_state = Some(path.into());
        self
    }

    pub fn depends_on(mut self, project: &str) -> Self {
        self.dependencies.push(project.to_string());
        self
    }

    pub fn without_browser(mut self) -> Self {
        self.browser = false;
        self
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|s| s.tests.len()).sum()
    }
}

/// Runner settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub workers: usize,
    pub retries: u32,
    pub forbid_only: bool,

    /// Matched against "<suite> <title>"
    pub grep: Option<Regex>,

    /// Projects to run; empty runs all
    pub projects: Vec<String>,

    pub test_timeout: Duration,
    pub screenshot: ScreenshotMode,
    pub trace: TraceMode,
    pub output_dir: PathBuf,

    /// Template for every browser context
    pub context: ContextOptions,
}

impl RunOptions {
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            workers: config.effective_workers(),
            retries: config.retries,
            forbid_only: config.forbid_only,
            grep: None,
            projects: Vec::new(),
            test_timeout: config.timeouts.test(),
            screenshot: config.screenshot,
            trace: config.trace,
            output_dir: config.output_dir.clone(),
            context: ContextOptions::from_suite(config),
        }
    }

    pub fn grep(mut self, pattern: &str) -> E2eResult<Self> {
        self.grep = Some(Regex::new(pattern)?);
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    /// Passed after at least one retry
    Flaky,
    Skipped,
}

/// Outcome of one test across all its attempts
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub project: String,
    pub suite: String,
    pub title: String,
    pub tags: Vec<String>,
    pub status: TestStatus,
    pub expected_failure: bool,
    pub retries: u32,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub attachments: Vec<Attachment>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TestResult {
    pub fn full_title(&self) -> String {
        if self.suite.is_empty() {
            self.title.clone()
        } else {
            format!("{} › {}", self.suite, self.title)
        }
    }

    fn skipped(job: &Job, reason: String) -> Self {
        let now = Utc::now();
        Self {
            project: job.project.name.clone(),
            suite: job.suite.clone(),
            title: job.case.title.clone(),
            tags: job.case.tags.clone(),
            status: TestStatus::Skipped,
            expected_failure: job.case.expectation == Expectation::Fail,
            retries: 0,
            duration_ms: 0,
            error: Some(reason),
            attachments: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    fn failed(job: &Job, reason: String) -> Self {
        Self {
            status: TestStatus::Failed,
            ..Self::skipped(job, reason)
        }
    }
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub flaky: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunReport {
    fn from_results(results: Vec<TestResult>, duration: Duration) -> Self {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        Self {
            total: results.len(),
            passed: count(TestStatus::Passed),
            failed: count(TestStatus::Failed),
            flaky: count(TestStatus::Flaky),
            skipped: count(TestStatus::Skipped),
            duration_ms: duration.as_millis() as u64,
            results,
        }
    }

    /// True when no test failed
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// A test selected for the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTest {
    pub project: String,
    pub suite: String,
    pub title: String,
    pub tags: Vec<String>,
}

struct PlannedProject {
    project: usize,
    tests: Vec<(usize, usize)>,
}

struct ProjectRun {
    name: String,
    storage_state: Option<PathBuf>,
    browser: bool,
}

struct Job {
    order: usize,
    project: Arc<ProjectRun>,
    suite: String,
    hooks: Vec<TestFn>,
    case: TestCase,
}

/// Orders projects by dependency and selects the tests to run
fn plan(projects: &[Project], options: &RunOptions) -> E2eResult<Vec<PlannedProject>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, project) in projects.iter().enumerate() {
        if index.insert(project.name.as_str(), i).is_some() {
            return Err(E2eError::Runner(format!(
                "duplicate project name: {}",
                project.name
            )));
        }
    }
    for project in projects {
        for dep in &project.dependencies {
            if !index.contains_key(dep.as_str()) {
                return Err(E2eError::Runner(format!(
                    "project '{}' depends on unknown project '{}'",
                    project.name, dep
                )));
            }
        }
    }
    let order = topological_order(projects, &index)?;

    let focused: Vec<&TestCase> = projects
        .iter()
        .flat_map(|p| p.suites.iter())
        .flat_map(|s| s.tests.iter())
        .filter(|t| t.only)
        .collect();
    if let Some(first) = focused.first() {
        if options.forbid_only {
            return Err(E2eError::Runner(format!(
                "focused test '{}' found while forbid_only is set",
                first.title
            )));
        }
    }
    let any_only = !focused.is_empty();

    let requested: Vec<usize> = if options.projects.is_empty() {
        (0..projects.len()).collect()
    } else {
        options
            .projects
            .iter()
            .map(|name| {
                index
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| E2eError::Runner(format!("unknown project: {}", name)))
            })
            .collect::<E2eResult<_>>()?
    };

    let select = |project: &Project, filtered: bool| -> Vec<(usize, usize)> {
        let mut tests = Vec::new();
        for (si, suite) in project.suites.iter().enumerate() {
            for (ti, case) in suite.tests.iter().enumerate() {
                if filtered {
                    if any_only && !case.only {
                        continue;
                    }
                    if let Some(grep) = &options.grep {
                        if !grep.is_match(&format!("{} {}", suite.name, case.title)) {
                            continue;
                        }
                    }
                }
                tests.push((si, ti));
            }
        }
        tests
    };

    let mut selected: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    for &i in &requested {
        let tests = select(&projects[i], true);
        if !tests.is_empty() {
            selected.insert(i, tests);
        }
    }

    // dependencies of anything selected run in full
    let mut stack: Vec<usize> = selected.keys().copied().collect();
    let mut needed: HashSet<usize> = HashSet::new();
    while let Some(i) = stack.pop() {
        for dep in &projects[i].dependencies {
            if let Some(&d) = index.get(dep.as_str()) {
                if needed.insert(d) {
                    stack.push(d);
                }
            }
        }
    }
    for d in needed {
        selected.insert(d, select(&projects[d], false));
    }

    Ok(order
        .into_iter()
        .filter_map(|i| {
            selected
                .remove(&i)
                .map(|tests| PlannedProject { project: i, tests })
        })
        .collect())
}

fn topological_order(projects: &[Project], index: &HashMap<&str, usize>) -> E2eResult<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Visiting,
        Done,
    }

    fn visit(
        i: usize,
        projects: &[Project],
        index: &HashMap<&str, usize>,
        marks: &mut [Mark],
        order: &mut Vec<usize>,
    ) -> E2eResult<()> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::Visiting => {
                return Err(E2eError::Runner(format!(
                    "dependency cycle through project '{}'",
                    projects[i].name
                )))
            }
            Mark::New => {}
        }
        marks[i] = Mark::Visiting;
        for dep in &projects[i].dependencies {
            if let Some(&d) = index.get(dep.as_str()) {
                visit(d, projects, index, marks, order)?;
            }
        }
        marks[i] = Mark::Done;
        order.push(i);
        Ok(())
    }

    let mut marks = vec![Mark::New; projects.len()];
    let mut order = Vec::with_capacity(projects.len());
    for i in 0..projects.len() {
        visit(i, projects, index, &mut marks, &mut order)?;
    }
    Ok(order)
}

/// List the tests a run would execute, in execution order
pub fn list(projects: &[Project], options: &RunOptions) -> E2eResult<Vec<PlannedTest>> {
    let planned = plan(projects, options)?;
    Ok(planned
        .iter()
        .flat_map(|p| {
            let project = &projects[p.project];
            p.tests.iter().map(move |&(si, ti)| {
                let suite = &project.suites[si];
                let case = &suite.tests[ti];
                PlannedTest {
                    project: project.name.clone(),
                    suite: suite.name.clone(),
                    title: case.title.clone(),
                    tags: case.tags.clone(),
                }
            })
        })
        .collect())
}

/// Runs projects against browsers from a launcher
pub struct TestRunner {
    launcher: Arc<dyn BrowserLauncher>,
    options: RunOptions,
    reporters: Vec<Arc<dyn Reporter>>,
}

impl TestRunner {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, options: RunOptions) -> Self {
        Self {
            launcher,
            options,
            reporters: Vec::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters.push(Arc::new(reporter));
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run every selected test and collect the report.
    ///
    /// Errors are returned only for problems with the run itself (bad
    /// project graph, focused tests under `forbid_only`); test failures end
    /// up in the report.
    pub async fn run(&self, projects: Vec<Project>) -> E2eResult<RunReport> {
        let start = Instant::now();
        let planned = plan(&projects, &self.options)?;
        let total: usize = planned.iter().map(|p| p.tests.len()).sum();
        let workers = self.options.workers.max(1);

        info!(
            "Running {} test(s) in {} project(s) using {} worker(s)",
            total,
            planned.len(),
            workers
        );
        for reporter in &self.reporters {
            reporter.on_begin(total);
        }

        let request = ApiRequest::new(
            &self.options.context.base_url,
            Duration::from_millis(self.options.context.navigation_timeout_ms),
        )?;
        let executor = Arc::new(Executor {
            launcher: self.launcher.clone(),
            options: self.options.clone(),
            reporters: self.reporters.clone(),
            request,
            browsers: (0..workers)
                .map(|_| tokio::sync::Mutex::new(None))
                .collect(),
        });

        let mut results = Vec::with_capacity(total);
        let mut unhealthy: HashSet<String> = HashSet::new();
        let mut order = 0;

        for planned_project in planned {
            let project = &projects[planned_project.project];
            let run = Arc::new(ProjectRun {
                name: project.name.clone(),
                storage_state: project.storage_state.clone(),
                browser: project.browser,
            });
            let jobs: Vec<Job> = planned_project
                .tests
                .iter()
                .map(|&(si, ti)| {
                    let suite = &project.suites[si];
                    order += 1;
                    Job {
                        order,
                        project: run.clone(),
                        suite: suite.name.clone(),
                        hooks: suite.before_each.clone(),
                        case: suite.tests[ti].clone(),
                    }
                })
                .collect();

            info!("Project '{}': {} test(s)", project.name, jobs.len());

            let blocked = project
                .dependencies
                .iter()
                .find(|d| unhealthy.contains(d.as_str()));
            let project_results = if let Some(dep) = blocked {
                warn!(
                    "Skipping project '{}': dependency '{}' did not pass",
                    project.name, dep
                );
                let reason = format!("dependency project '{}' did not pass", dep);
                jobs.iter()
                    .map(|job| executor.finish(TestResult::skipped(job, reason.clone())))
                    .collect()
            } else if let Err(e) = self.check_storage_state(project) {
                error!("Project '{}' cannot start: {}", project.name, e);
                jobs.iter()
                    .map(|job| executor.finish(TestResult::failed(job, e.to_string())))
                    .collect()
            } else {
                executor.run_jobs(jobs).await
            };

            if project_results
                .iter()
                .any(|r| matches!(r.status, TestStatus::Failed | TestStatus::Skipped))
            {
                unhealthy.insert(project.name.clone());
            }
            results.extend(project_results);
        }

        executor.close_browsers().await;

        let report = RunReport::from_results(results, start.elapsed());
        info!(
            "Test Results: {} passed, {} failed, {} flaky, {} skipped ({} ms)",
            report.passed, report.failed, report.flaky, report.skipped, report.duration_ms
        );
        for reporter in &self.reporters {
            if let Err(e) = reporter.on_end(&report) {
                error!("Reporter failed: {}", e);
            }
        }
        Ok(report)
    }

    fn check_storage_state(&self, project: &Project) -> E2eResult<()> {
        if let Some(path) = &project.storage_state {
            let producer = project
                .dependencies
                .first()
                .map(String::as_str)
                .unwrap_or("setup");
            auth::require(path, producer)?;
        }
        Ok(())
    }
}

type BrowserSlot = tokio::sync::Mutex<Option<Arc<dyn PageFactory>>>;

/// State shared by the worker tasks of a run
struct Executor {
    launcher: Arc<dyn BrowserLauncher>,
    options: RunOptions,
    reporters: Vec<Arc<dyn Reporter>>,
    request: ApiRequest,
    browsers: Vec<BrowserSlot>,
}

struct Attempt {
    passed: bool,
    error: Option<String>,
    attachments: Vec<Attachment>,
}

impl Executor {
    fn finish(&self, result: TestResult) -> TestResult {
        for reporter in &self.reporters {
            reporter.on_test_end(&result);
        }
        result
    }

    async fn run_jobs(self: &Arc<Self>, jobs: Vec<Job>) -> Vec<TestResult> {
        let workers = self.browsers.len().min(jobs.len());
        let queue = Arc::new(Mutex::new(VecDeque::from(jobs)));
        let collected: Arc<Mutex<Vec<(usize, TestResult)>>> = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::with_capacity(workers);
        for slot in 0..workers {
            let executor = self.clone();
            let queue = queue.clone();
            let collected = collected.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let job = queue.lock().pop_front();
                    let Some(job) = job else { break };
                    let order = job.order;
                    let result = executor.run_test(job, slot).await;
                    collected.lock().push((order, executor.finish(result)));
                }
            }));
        }
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Worker task failed: {}", e);
            }
        }

        let mut results = std::mem::take(&mut *collected.lock());
        results.sort_by_key(|(order, _)| *order);
        results.into_iter().map(|(_, r)| r).collect()
    }

    async fn run_test(&self, job: Job, slot: usize) -> TestResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let retries = self.options.retries;

        let mut status = TestStatus::Failed;
        let mut error = None;
        let mut attachments = Vec::new();
        let mut attempts = 0;

        for retry in 0..=retries {
            attempts = retry;
            let attempt = self.run_attempt(&job, slot, retry).await;
            attachments.extend(attempt.attachments);
            if attempt.passed {
                status = if retry > 0 {
                    TestStatus::Flaky
                } else {
                    TestStatus::Passed
                };
                break;
            }
            error = attempt.error;
            if retry < retries {
                warn!(
                    "Retrying '{}' ({}/{}): {}",
                    job.case.title,
                    retry + 1,
                    retries,
                    error.as_deref().unwrap_or("unknown error")
                );
            }
        }

        TestResult {
            project: job.project.name.clone(),
            suite: job.suite.clone(),
            title: job.case.title.clone(),
            tags: job.case.tags.clone(),
            status,
            expected_failure: job.case.expectation == Expectation::Fail,
            retries: attempts,
            duration_ms: start.elapsed().as_millis() as u64,
            error,
            attachments,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn run_attempt(&self, job: &Job, slot: usize, retry: u32) -> Attempt {
        let mut dir = format!(
            "{}-{}",
            crate::fixture::slugify(&format!("{} {}", job.suite, job.case.title)),
            job.project.name
        );
        if retry > 0 {
            dir.push_str(&format!("-retry{}", retry));
        }
        let info = TestInfo {
            project: job.project.name.clone(),
            suite: job.suite.clone(),
            title: job.case.title.clone(),
            tags: job.case.tags.clone(),
            retry,
            output_dir: self.options.output_dir.join(dir),
        };

        let factory = if job.project.browser {
            match self.browser(slot).await {
                Ok(factory) => Some(factory),
                Err(e) => {
                    return Attempt {
                        passed: false,
                        error: Some(format!("browser launch failed: {}", e)),
                        attachments: Vec::new(),
                    }
                }
            }
        } else {
            None
        };

        let mut context = self.options.context.clone();
        context.storage_state = job.project.storage_state.clone();
        context.trace = job.project.browser && self.options.trace.records(retry);

        debug!("Starting '{}' (retry {})", info.full_title(), retry);
        let ctx = TestContext::new(info, factory, context, self.request.clone());

        let timeout = self.options.test_timeout;
        let mut body_started = false;
        let attempt = async {
            for hook in &job.hooks {
                hook(&ctx).await?;
            }
            body_started = true;
            (job.case.body)(&ctx).await
        };
        let finished = tokio::time::timeout(timeout, AssertUnwindSafe(attempt).catch_unwind()).await;

        let outcome = match finished {
            Ok(Ok(Ok(()))) => Outcome::Passed,
            Ok(Ok(Err(e))) if !body_started => Outcome::HookFailed(e),
            Ok(Ok(Err(e))) => Outcome::BodyFailed(e),
            Ok(Err(panic)) => {
                let e = E2eError::Runner(format!(
                    "test panicked: {}",
                    panic_message(panic.as_ref())
                ));
                if body_started {
                    Outcome::BodyFailed(e)
                } else {
                    Outcome::HookFailed(e)
                }
            }
            Err(_) => Outcome::TimedOut(E2eError::Timeout(format!(
                "test timeout of {}ms exceeded",
                timeout.as_millis()
            ))),
        };

        let (passed, error) = outcome.judge(job.case.expectation, &job.case.title);

        let attachments = ctx
            .teardown(!passed, self.options.screenshot, self.options.trace)
            .await;

        Attempt {
            passed,
            error,
            attachments,
        }
    }

    /// The worker's browser, launched on first use
    async fn browser(&self, slot: usize) -> E2eResult<Arc<dyn PageFactory>> {
        let cell = self
            .browsers
            .get(slot)
            .ok_or_else(|| E2eError::Runner(format!("no browser slot {}", slot)))?;
        let mut guard = cell.lock().await;
        if let Some(factory) = guard.as_ref() {
            return Ok(factory.clone());
        }
        debug!("Worker {} launching browser", slot);
        let factory = self.launcher.launch().await?;
        *guard = Some(factory.clone());
        Ok(factory)
    }

    async fn close_browsers(&self) {
        for cell in &self.browsers {
            if let Some(factory) = cell.lock().await.take() {
                if let Err(e) = factory.close().await {
                    warn!("Closing browser failed: {}", e);
                }
            }
        }
    }
}

/// How an attempt ended, before the test's expectation is applied
enum Outcome {
    Passed,
    /// The body returned an error or panicked
    BodyFailed(E2eError),
    /// A before-each hook failed; the body never ran
    HookFailed(E2eError),
    /// The test timeout elapsed
    TimedOut(E2eError),
}

impl Outcome {
    /// Whether the attempt counts as passed, and the error to report.
    ///
    /// Only a failing body satisfies a known failure; hook errors and
    /// timeouts fail the test either way.
    fn judge(self, expectation: Expectation, title: &str) -> (bool, Option<String>) {
        match (expectation, self) {
            (Expectation::Pass, Outcome::Passed) => (true, None),
            (Expectation::Fail, Outcome::Passed) => {
                (false, Some("Expected to fail, but passed.".to_string()))
            }
            (Expectation::Fail, Outcome::BodyFailed(e)) => {
                debug!("'{}' failed as expected: {}", title, e);
                (true, None)
            }
            (_, Outcome::BodyFailed(e) | Outcome::HookFailed(e) | Outcome::TimedOut(e)) => {
                (false, Some(e.to_string()))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
