//! Line chart handles with an explicit lifecycle
//!
//! Each chart surface holds at most one live chart instance. Drawing a new
//! chart releases the previous handle before installing its replacement, so a
//! redraw can never leave two charts stacked on the same surface.

use std::fmt;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One named series of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Everything needed to draw one line chart
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// A live chart instance
///
/// Owned by exactly one [`ChartSurface`]; dropping the handle is what
/// releases the instance.
#[derive(Debug)]
pub struct ChartHandle {
    id: u64,
    spec: ChartSpec,
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    /// Render each series as a one-line sparkline with its range
    ///
    /// Non-finite values render as gaps.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for dataset in &self.spec.datasets {
            let finite: Vec<f64> = dataset
                .values
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            if finite.is_empty() {
                lines.push(format!("{}: (no data)", dataset.label));
                continue;
            }
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let span = max - min;
            let spark: String = dataset
                .values
                .iter()
                .map(|&v| {
                    if !v.is_finite() {
                        return ' ';
                    }
                    if span == 0.0 {
                        return SPARK_LEVELS[0];
                    }
                    let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                    SPARK_LEVELS[level as usize]
                })
                .collect();
            lines.push(format!(
                "{} [{:.1}..{:.1}]: {}",
                dataset.label, min, max, spark
            ));
        }
        lines
    }
}

impl fmt::Display for ChartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart #{} ({} series)", self.id, self.spec.datasets.len())
    }
}

/// A drawing surface holding at most one live chart
#[derive(Debug, Default)]
pub struct ChartSurface {
    active: Option<ChartHandle>,
    generation: u64,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a chart, replacing any live instance
    ///
    /// The previous handle is released before the new one is created.
    pub fn draw(&mut self, spec: ChartSpec) -> &ChartHandle {
        if let Some(old) = self.active.take() {
            log::debug!("releasing {} before redraw", old);
        }
        self.generation += 1;
        self.active.insert(ChartHandle {
            id: self.generation,
            spec,
        })
    }

    pub fn active(&self) -> Option<&ChartHandle> {
        self.active.as_ref()
    }

    /// Number of live chart instances on this surface (0 or 1)
    pub fn live_count(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(values: Vec<f64>) -> ChartSpec {
        ChartSpec {
            labels: (0..values.len()).map(|i| format!("d{}", i)).collect(),
            datasets: vec![Dataset::new("temp", values)],
        }
    }

    #[test]
    fn test_empty_surface() {
        let surface = ChartSurface::new();
        assert!(surface.active().is_none());
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_redraw_replaces_instance() {
        let mut surface = ChartSurface::new();
        let first_id = surface.draw(spec(vec![1.0, 2.0])).id();
        assert_eq!(surface.live_count(), 1);

        let second_id = surface.draw(spec(vec![3.0, 4.0])).id();
        assert_eq!(surface.live_count(), 1);
        assert_ne!(first_id, second_id);
        assert_eq!(surface.active().unwrap().id(), second_id);
    }

    #[test]
    fn test_clear_releases_instance() {
        let mut surface = ChartSurface::new();
        surface.draw(spec(vec![1.0]));
        surface.clear();
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_render_sparkline() {
        let mut surface = ChartSurface::new();
        let lines = surface.draw(spec(vec![0.0, 5.0, 10.0])).render();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("temp [0.0..10.0]: "));
        assert!(lines[0].ends_with('█'));
    }

    #[test]
    fn test_render_handles_gaps_and_flat_series() {
        let mut surface = ChartSurface::new();
        let handle = surface.draw(ChartSpec {
            labels: vec!["a".into(), "b".into(), "c".into()],
            datasets: vec![
                Dataset::new("gappy", vec![1.0, f64::NAN, 2.0]),
                Dataset::new("flat", vec![4.0, 4.0]),
            ],
        });
        let lines = handle.render();
        assert!(lines[0].contains(' '));
        assert!(lines[1].contains('▁'));
    }
}
