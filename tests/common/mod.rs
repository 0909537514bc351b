#![allow(dead_code)]

use dag_maker::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Shared log of "create:X" / "destroy:X" events
pub type Events = Arc<Mutex<Vec<String>>>;

pub fn events() -> Events {
    Arc::new(Mutex::new(Vec::new()))
}

/// Value built by a [`Recorder`]
pub struct Probe {
    pub name: String,
    alive: AtomicBool,
}

impl Probe {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// Factory that records every operation and checks what gets injected
pub struct Recorder {
    name: String,
    dependencies: Dependencies,
    events: Events,
    fail_create: bool,
    fail_destroy: bool,
}

impl Recorder {
    pub fn new(name: &str, events: &Events) -> Self {
        Self {
            name: name.to_string(),
            dependencies: Dependencies::new(),
            events: Arc::clone(events),
            fail_create: false,
            fail_destroy: false,
        }
    }

    pub fn depends_on(mut self, local: &str, factory: &SharedFactory) -> Self {
        self.dependencies.insert(local.to_string(), Arc::clone(factory));
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_destroy(mut self) -> Self {
        self.fail_destroy = true;
        self
    }

    pub fn shared(self) -> SharedFactory {
        Arc::new(self)
    }
}

#[async_trait]
impl VertexFactory for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Dependencies {
        self.dependencies.clone()
    }

    async fn create(&self, options: VertexOptions) -> Result<Instance, BoxError> {
        let injected: Vec<&str> = options.keys().collect();
        let declared: Vec<&str> = self.dependencies.keys().map(String::as_str).collect();
        assert_eq!(injected, declared, "options of {}", self.name);

        for (local, dependency) in &self.dependencies {
            let probe = options.get::<Probe>(local)?;
            assert_eq!(probe.name, dependency.name(), "options.{} of {}", local, self.name);
            assert!(probe.is_alive(), "{} injected after destroy", probe.name);
        }

        self.events.lock().await.push(format!("create:{}", self.name));
        if self.fail_create {
            return Err(format!("{} refused to start", self.name).into());
        }

        Ok(Instance::new(Probe {
            name: self.name.clone(),
            alive: AtomicBool::new(true),
        }))
    }

    async fn destroy(&self, instance: Instance) -> Result<(), BoxError> {
        let probe = instance
            .downcast::<Probe>()
            .map_err(|actual| format!("unexpected instance type {}", actual))?;
        assert_eq!(probe.name, self.name);

        self.events.lock().await.push(format!("destroy:{}", self.name));
        if self.fail_destroy {
            return Err(format!("{} refused to stop", self.name).into());
        }

        probe.alive.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Check both orders, then a full create/destroy round trip
///
/// Every factory in `factories` must be built and destroyed, creation must
/// follow `dependencies` and destruction `dependents`, one event per vertex.
pub async fn assert_lifecycle(
    factories: Vec<SharedFactory>,
    events: &Events,
    dependencies: Vec<Vec<&str>>,
    dependents: Vec<Vec<&str>>,
) {
    let maker = DagMaker::new(factories.clone());

    assert_eq!(
        maker.order_by(Direction::Dependencies).unwrap(),
        dependencies,
        "order by dependencies"
    );
    assert_eq!(
        maker.order_by(Direction::Dependents).unwrap(),
        dependents,
        "order by dependents"
    );

    events.lock().await.clear();

    let dag = maker.create().await.unwrap();
    for factory in &factories {
        let probe = dag.resolve::<Probe>(factory.name()).unwrap();
        assert!(probe.is_alive());
    }

    maker.destroy(&dag).await.unwrap();
    for factory in &factories {
        let probe = dag.resolve::<Probe>(factory.name()).unwrap();
        assert!(!probe.is_alive());
    }

    let expected: Vec<String> = dependencies
        .iter()
        .flatten()
        .map(|name| format!("create:{}", name))
        .chain(
            dependents
                .iter()
                .flatten()
                .map(|name| format!("destroy:{}", name)),
        )
        .collect();
    assert_eq!(*events.lock().await, expected);
}
