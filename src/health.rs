//! Health monitoring for work pools

/// Health status of a work pool
///
/// # Examples
///
/// ```
/// use esox_workpool::WorkPool;
///
/// let pool = WorkPool::bounded(4);
/// pool.push(1);
///
/// let health = pool.health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.queued_items, 1);
/// ```
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Current buffer utilization (0.0 to 1.0; 0.0 for unbounded pools)
    pub utilization: f64,

    /// Items currently queued
    pub queued_items: usize,

    /// Capacity limit, `None` for unbounded pools
    pub capacity: Option<usize>,

    /// Whether every registered terminator has voted
    pub is_terminating: bool,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status
    pub fn new(queued: usize, capacity: Option<usize>, terminating: bool) -> Self {
        let utilization = match capacity {
            Some(limit) if limit > 0 => queued as f64 / limit as f64,
            _ => 0.0,
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        // Check for high utilization
        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
            is_healthy = false;
        }

        if let Some(limit) = capacity
            && queued >= limit
            && limit > 0
        {
            warnings.push("Buffer is full - producers are blocked".to_string());
        }

        // Draining is an expected phase, not a fault
        if terminating {
            warnings.push("Pool is terminating - draining remaining items".to_string());
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            utilization,
            queued_items: queued,
            capacity,
            is_terminating: terminating,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}
