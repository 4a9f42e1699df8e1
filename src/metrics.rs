//! Metrics collection and export for work pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Metrics snapshot for a pool
///
/// # Examples
///
/// ```
/// use esox_workpool::WorkPool;
///
/// let pool = WorkPool::bounded(8);
/// pool.push(1);
/// pool.push(2);
///
/// let metrics = pool.metrics();
/// assert_eq!(metrics.total_pushed, 2);
/// assert_eq!(metrics.queued_items, 2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Total items pushed into the pool
    pub total_pushed: usize,

    /// Total items popped from the pool
    pub total_popped: usize,

    /// Items currently queued
    pub queued_items: usize,

    /// Number of times a push had to wait for a free slot
    pub pool_full_events: usize,

    /// Number of times a pop had to wait for an item
    pub pool_empty_events: usize,

    /// Number of pops that observed the terminated condition
    pub terminated_pops: usize,

    /// Buffer utilization ratio (0.0 to 1.0; 0.0 for unbounded pools)
    pub utilization: f64,

    /// Capacity limit, `None` for unbounded pools
    pub capacity: Option<usize>,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_pushed".to_string(), self.total_pushed.to_string());
        metrics.insert("total_popped".to_string(), self.total_popped.to_string());
        metrics.insert("queued_items".to_string(), self.queued_items.to_string());
        metrics.insert("pool_full_events".to_string(), self.pool_full_events.to_string());
        metrics.insert("pool_empty_events".to_string(), self.pool_empty_events.to_string());
        metrics.insert("terminated_pops".to_string(), self.terminated_pops.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics.insert(
            "capacity".to_string(),
            self.capacity.map_or("unbounded".to_string(), |c| c.to_string()),
        );
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_workpool::{MetricsExporter, WorkPool};
    /// use std::collections::HashMap;
    ///
    /// let pool = WorkPool::bounded(8);
    /// pool.push(1);
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("my_pool", Some(&tags));
    /// assert!(output.contains("workpool_items_queued"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        output.push_str("# HELP workpool_items_queued Items currently queued\n");
        output.push_str("# TYPE workpool_items_queued gauge\n");
        output.push_str(&format!("workpool_items_queued{{{}}} {}\n", labels, metrics.queued_items));

        output.push_str("# HELP workpool_utilization Buffer utilization ratio\n");
        output.push_str("# TYPE workpool_utilization gauge\n");
        output.push_str(&format!("workpool_utilization{{{}}} {:.2}\n", labels, metrics.utilization));

        // Counter metrics
        output.push_str("# HELP workpool_items_pushed_total Total items pushed\n");
        output.push_str("# TYPE workpool_items_pushed_total counter\n");
        output.push_str(&format!("workpool_items_pushed_total{{{}}} {}\n", labels, metrics.total_pushed));

        output.push_str("# HELP workpool_items_popped_total Total items popped\n");
        output.push_str("# TYPE workpool_items_popped_total counter\n");
        output.push_str(&format!("workpool_items_popped_total{{{}}} {}\n", labels, metrics.total_popped));

        output.push_str("# HELP workpool_events_full_total Pushes that had to wait for a slot\n");
        output.push_str("# TYPE workpool_events_full_total counter\n");
        output.push_str(&format!("workpool_events_full_total{{{}}} {}\n", labels, metrics.pool_full_events));

        output.push_str("# HELP workpool_events_empty_total Pops that had to wait for an item\n");
        output.push_str("# TYPE workpool_events_empty_total counter\n");
        output.push_str(&format!("workpool_events_empty_total{{{}}} {}\n", labels, metrics.pool_empty_events));

        output.push_str("# HELP workpool_pops_terminated_total Pops that observed termination\n");
        output.push_str("# TYPE workpool_pops_terminated_total counter\n");
        output.push_str(&format!("workpool_pops_terminated_total{{{}}} {}\n", labels, metrics.terminated_pops));

        output
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
pub(crate) struct MetricsTracker {
    pub total_pushed: AtomicUsize,
    pub total_popped: AtomicUsize,
    pub pool_full_events: AtomicUsize,
    pub pool_empty_events: AtomicUsize,
    pub terminated_pops: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            total_pushed: AtomicUsize::new(0),
            total_popped: AtomicUsize::new(0),
            pool_full_events: AtomicUsize::new(0),
            pool_empty_events: AtomicUsize::new(0),
            terminated_pops: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self, queued: usize, capacity: Option<usize>) -> PoolMetrics {
        let utilization = match capacity {
            Some(limit) if limit > 0 => queued as f64 / limit as f64,
            _ => 0.0,
        };

        PoolMetrics {
            total_pushed: self.total_pushed.load(Ordering::Relaxed),
            total_popped: self.total_popped.load(Ordering::Relaxed),
            queued_items: queued,
            pool_full_events: self.pool_full_events.load(Ordering::Relaxed),
            pool_empty_events: self.pool_empty_events.load(Ordering::Relaxed),
            terminated_pops: self.terminated_pops.load(Ordering::Relaxed),
            utilization,
            capacity,
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}
