//! Test Wrapper
//!
//! Turns a test body plus its optional setup and data-generation hooks into
//! a single zero-argument routine the sampler can call repeatedly.
//!
//! - `before` runs exactly once, on the first measured call; its error
//!   is returned instead of calling the test body
//! - generated data is drawn from a pool in cyclic order
//! - without hooks the wrapper only forwards to the test body

use crate::suite::BoxError;

/// Items pre-generated when a test uses a single-item data generator
pub const DATA_SAMPLE_SIZE: usize = 100;

/// Optional hooks for a single test
pub struct TestOptions<D> {
    before: Option<BeforeHook>,
    generate_data: Option<Box<dyn FnMut() -> D>>,
    generate_data_array: Option<Box<dyn FnMut() -> Vec<D>>>,
}

type BeforeHook = Box<dyn FnMut() -> Result<(), BoxError>>;

impl<D> Default for TestOptions<D> {
    fn default() -> Self {
        Self {
            before: None,
            generate_data: None,
            generate_data_array: None,
        }
    }
}

impl<D> TestOptions<D> {
    /// No hooks
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `before` once, immediately ahead of the first measured call.
    pub fn before<F>(self, mut before: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.try_before(move || {
            before();
            Ok::<(), BoxError>(())
        })
    }

    /// Like [`TestOptions::before`], for setup that can fail.
    ///
    /// An error aborts the suite with [`SuiteError::Setup`](crate::SuiteError::Setup).
    pub fn try_before<F, E>(mut self, mut before: F) -> Self
    where
        F: FnMut() -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        self.before = Some(Box::new(move || before().map_err(Into::into)));
        self
    }

    /// Fill a pool of [`DATA_SAMPLE_SIZE`] items by calling `generator` once per item.
    pub fn generate_data<F>(mut self, generator: F) -> Self
    where
        F: FnMut() -> D + 'static,
    {
        self.generate_data = Some(Box::new(generator));
        self
    }

    /// Use the vector returned by `generator` as the pool.
    ///
    /// Takes precedence over [`TestOptions::generate_data`] when both are set.
    pub fn generate_data_array<F>(mut self, generator: F) -> Self
    where
        F: FnMut() -> Vec<D> + 'static,
    {
        self.generate_data_array = Some(Box::new(generator));
        self
    }
}

/// Whether the first measured call has happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `before` has not run yet
    NotStarted,
    /// `before` has run; calls go straight to the test body
    Running,
}

enum DataSource<D> {
    None,
    Single(Box<dyn FnMut() -> D>),
    Array(Box<dyn FnMut() -> Vec<D>>),
}

/// A test body with its hooks applied
pub struct WrappedTest<D> {
    callback: Box<dyn FnMut(Option<&D>)>,
    before: Option<BeforeHook>,
    source: DataSource<D>,
    pool: Vec<D>,
    index: usize,
    phase: Phase,
}

impl<D> WrappedTest<D> {
    /// Wrap `callback` with the given hooks.
    ///
    /// The callback receives the next pooled item, or `None` when the test
    /// has no data source or the pool is empty.
    pub fn new<F>(callback: F, options: TestOptions<D>) -> Self
    where
        F: FnMut(Option<&D>) + 'static,
    {
        let TestOptions {
            before,
            generate_data,
            generate_data_array,
        } = options;

        let source = match (generate_data_array, generate_data) {
            (Some(array), _) => DataSource::Array(array),
            (None, Some(single)) => DataSource::Single(single),
            (None, None) => DataSource::None,
        };

        Self {
            callback: Box::new(callback),
            before,
            source,
            pool: Vec::new(),
            index: 0,
            phase: Phase::NotStarted,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of pooled data items
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Whether this test has a data generator
    pub fn generates_data(&self) -> bool {
        !matches!(self.source, DataSource::None)
    }

    /// (Re)build the data pool and rewind to its first item.
    pub fn generate_data(&mut self) {
        match &mut self.source {
            DataSource::None => return,
            DataSource::Single(generator) => {
                self.pool.clear();
                self.pool.reserve(DATA_SAMPLE_SIZE);
                for _ in 0..DATA_SAMPLE_SIZE {
                    self.pool.push(generator());
                }
            }
            DataSource::Array(generator) => {
                self.pool = generator();
            }
        }
        self.index = 0;
    }

    /// Run `before` if this is the first call.
    ///
    /// The phase moves to `Running` even when `before` fails, so the hook
    /// is never retried.
    pub fn start(&mut self) -> Result<(), BoxError> {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::Running;
            if let Some(before) = self.before.as_mut() {
                before()?;
            }
        }
        Ok(())
    }

    /// One measured invocation.
    pub fn call(&mut self) -> Result<(), BoxError> {
        self.start()?;
        self.call_with_data();
        Ok(())
    }

    fn call_with_data(&mut self) {
        (self.callback)(self.pool.get(self.index));

        if !self.pool.is_empty() {
            self.index += 1;
            if self.index >= self.pool.len() {
                self.index = 0;
            }
        }
    }
}

/// Type-erased view of a [`WrappedTest`], so one suite can hold tests with
/// different data types
pub trait TestRoutine {
    /// Whether [`TestRoutine::generate_data`] does anything
    fn generates_data(&self) -> bool;
    /// Build the data pool
    fn generate_data(&mut self);
    /// Run the once-only `before` hook ahead of measurement
    fn start(&mut self) -> Result<(), BoxError>;
    /// One measured invocation
    fn call(&mut self) -> Result<(), BoxError>;
}

impl<D> TestRoutine for WrappedTest<D> {
    fn generates_data(&self) -> bool {
        WrappedTest::generates_data(self)
    }

    fn generate_data(&mut self) {
        WrappedTest::generate_data(self)
    }

    fn start(&mut self) -> Result<(), BoxError> {
        WrappedTest::start(self)
    }

    fn call(&mut self) -> Result<(), BoxError> {
        WrappedTest::call(self)
    }
}
