// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The benchmark harness.  A round is one complete dispatch, timed
//! with a monotonic clock in whole milliseconds.  A `TrialRunner`
//! repeats rounds for each configuration and reduces every series
//! with an aggregation function, normally `median`.

use std::str::FromStr;
use std::time::Instant;

use crate::errors::{MandelError, Result};

/// Reduces a timing series to one number.  `None` for an empty series.
pub type Aggregate = fn(&[u64]) -> Option<u64>;

/// The middle of the sorted series; for an even number of samples the
/// truncated mean of the two middle ones.
pub fn median(series: &[u64]) -> Option<u64> {
    if series.is_empty() {
        return None;
    }
    let mut sorted = series.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2)
    } else {
        Some(sorted[mid])
    }
}

/// Runs `round` once and reports how many milliseconds it took along
/// with whatever it produced.
pub fn time_round<T, F>(round: F) -> Result<(T, u64)>
where
    F: FnOnce() -> Result<T>,
{
    let start = Instant::now();
    let value = round()?;
    let elapsed = start.elapsed().as_millis() as u64;
    Ok((value, elapsed))
}

/// The timings of one configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// The thread count the samples were taken with
    pub threads: usize,
    /// Every sample, in the order taken
    pub series: Vec<u64>,
    /// The aggregated value
    pub aggregate: u64,
}

impl Summary {
    /// The series sorted ascending, for display.
    pub fn sorted(&self) -> Vec<u64> {
        let mut sorted = self.series.clone();
        sorted.sort();
        sorted
    }
}

/// Which set of thread counts to benchmark.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Benchmark {
    /// Every thread count from 1 up to and including the given one.
    Sweep(usize),
    /// One thread count, repeated.
    Repeat(usize),
}

impl Benchmark {
    /// Builds a benchmark from a mode name and a thread count.
    pub fn from_mode(mode: &str, threads: usize) -> Result<Benchmark> {
        match mode.parse::<Mode>()? {
            Mode::Sweep => Ok(Benchmark::Sweep(threads)),
            Mode::Repeat => Ok(Benchmark::Repeat(threads)),
        }
    }

    /// The thread counts to run, in order.
    pub fn configurations(self) -> Vec<usize> {
        match self {
            Benchmark::Sweep(max) => (1..=max).collect(),
            Benchmark::Repeat(threads) => vec![threads],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Mode {
    Sweep,
    Repeat,
}

impl FromStr for Mode {
    type Err = MandelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sweep" => Ok(Mode::Sweep),
            "repeat" => Ok(Mode::Repeat),
            other => Err(MandelError::UnknownMode(other.to_string())),
        }
    }
}

/// Repeats timed rounds over a list of configurations.
pub struct TrialRunner {
    configurations: Vec<usize>,
    repetitions: usize,
    aggregate: Aggregate,
}

impl TrialRunner {
    /// `repetitions` rounds for each entry of `configurations`, each
    /// series reduced with `aggregate`.
    pub fn new(configurations: Vec<usize>, repetitions: usize, aggregate: Aggregate) -> Self {
        TrialRunner {
            configurations,
            repetitions,
            aggregate,
        }
    }

    /// A runner for one of the named benchmarks, aggregated by median.
    pub fn for_benchmark(benchmark: Benchmark, repetitions: usize) -> Self {
        TrialRunner::new(benchmark.configurations(), repetitions, median)
    }

    /// Runs every round.  `round` gets the thread count and returns
    /// the rendered output; `observe` sees each (threads, round index,
    /// milliseconds) as it is taken.  Returns one summary per
    /// configuration, in order, along with the output of the final
    /// round.
    pub fn run<T, R, O>(&self, mut round: R, mut observe: O) -> Result<(Vec<Summary>, Option<T>)>
    where
        R: FnMut(usize) -> Result<T>,
        O: FnMut(usize, usize, u64),
    {
        let mut summaries = Vec::with_capacity(self.configurations.len());
        let mut last = None;
        for &threads in &self.configurations {
            info!("timing {} rounds with {} threads", self.repetitions, threads);
            let mut series = Vec::with_capacity(self.repetitions);
            for index in 0..self.repetitions {
                let (output, elapsed) = time_round(|| round(threads))?;
                observe(threads, index, elapsed);
                series.push(elapsed);
                last = Some(output);
            }
            if let Some(aggregate) = (self.aggregate)(&series) {
                summaries.push(Summary {
                    threads,
                    series,
                    aggregate,
                });
            }
        }
        Ok((summaries, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn median_of_odd_series() {
        assert_eq!(median(&[5, 1, 9]), Some(5));
        assert_eq!(median(&[7]), Some(7));
    }

    #[test]
    fn median_of_even_series_truncates() {
        assert_eq!(median(&[4, 8, 2, 6]), Some(5));
        assert_eq!(median(&[1, 2]), Some(1));
        assert_eq!(median(&[3, 3, 4, 100]), Some(3));
    }

    #[test]
    fn median_of_nothing() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_resists_one_outlier() {
        assert_eq!(median(&[10, 11, 9, 10, 5000]), Some(10));
    }

    #[test]
    fn time_round_passes_errors_through() {
        let r: Result<((), u64)> = time_round(|| Err(MandelError::NoThreads));
        assert!(r.is_err());
        let (value, _) = time_round(|| Ok(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn benchmarks_expand_to_configurations() {
        assert_eq!(Benchmark::Sweep(4).configurations(), vec![1, 2, 3, 4]);
        assert_eq!(Benchmark::Repeat(3).configurations(), vec![3]);
        assert_eq!(Benchmark::from_mode("sweep", 2).unwrap(), Benchmark::Sweep(2));
        assert_eq!(Benchmark::from_mode("repeat", 2).unwrap(), Benchmark::Repeat(2));
        assert!(Benchmark::from_mode("forever", 2).is_err());
    }

    #[test]
    fn runner_visits_every_configuration_in_order() {
        let calls = Cell::new(0);
        let mut seen = vec![];
        let runner = TrialRunner::new(vec![1, 2, 4], 3, median);
        let (summaries, last) = runner
            .run(
                |threads| {
                    calls.set(calls.get() + 1);
                    Ok(threads * 10)
                },
                |threads, index, _| seen.push((threads, index)),
            )
            .unwrap();
        assert_eq!(calls.get(), 9);
        assert_eq!(last, Some(40));
        assert_eq!(seen.len(), 9);
        assert_eq!(seen[0], (1, 0));
        assert_eq!(seen[8], (4, 2));
        let threads: Vec<usize> = summaries.iter().map(|s| s.threads).collect();
        assert_eq!(threads, vec![1, 2, 4]);
        assert!(summaries.iter().all(|s| s.series.len() == 3));
    }

    #[test]
    fn runner_uses_the_given_aggregate() {
        fn largest(series: &[u64]) -> Option<u64> {
            series.iter().cloned().max()
        }
        let runner = TrialRunner::new(vec![1], 2, largest);
        let (summaries, _) = runner.run(|_| Ok(()), |_, _, _| ()).unwrap();
        assert_eq!(summaries[0].aggregate, *summaries[0].series.iter().max().unwrap());
    }

    #[test]
    fn runner_stops_on_the_first_error() {
        let runner = TrialRunner::new(vec![1, 2], 2, median);
        let mut rounds = 0;
        let result: Result<(Vec<Summary>, Option<()>)> = runner.run(
            |threads| {
                rounds += 1;
                if threads == 2 {
                    Err(MandelError::WorkerPanicked)
                } else {
                    Ok(())
                }
            },
            |_, _, _| (),
        );
        assert!(result.is_err());
        assert_eq!(rounds, 3);
    }

    #[test]
    fn summaries_sort_for_display() {
        let s = Summary {
            threads: 1,
            series: vec![3, 1, 2],
            aggregate: 2,
        };
        assert_eq!(s.sorted(), vec![1, 2, 3]);
    }
}
