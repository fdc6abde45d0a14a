//! Size measurement channel.
//!
//! Rendering surfaces learn the natural size of an element only after they
//! have drawn it once. They push those observations through a
//! [`SizeReporter`]; the owning [`SizeChannel`] merges them into a single
//! [`SizeMap`] and hands the complete, merged map to its subscribers.
//!
//! # Merge semantics
//!
//! - Reports are buffered in a single-writer queue and merged in arrival order
//!   by [`SizeChannel::flush`]. Readers never observe a half-merged batch.
//! - For one key the most recent report wins. Reports for different keys are
//!   unioned.
//! - The container's own size travels on the same channel under the reserved
//!   [`MeasureKey::Container`] key, which cannot collide with any element id.

use std::{
    collections::HashMap,
    fmt,
    hash::Hash,
    sync::mpsc::{self, Receiver, Sender},
};

use log::{debug, trace};

use chipflow_core::geometry::Size;

use crate::layout::SizeLookup;

/// Key of a size report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeasureKey<K> {
    /// The measured size of the element with this identity.
    Element(K),
    /// The measured size of the container itself, of which only the width
    /// is used for layout.
    Container,
}

/// Merged measurements: the last known size of each element and of the container.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeMap<K: Eq + Hash> {
    elements: SizeLookup<K>,
    container: Option<Size>,
}

impl<K: Eq + Hash> SizeMap<K> {
    /// Creates an empty size map.
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            container: None,
        }
    }

    /// Returns the last known size of an element, or zero if it was never measured.
    pub fn size_of(&self, id: &K) -> Size {
        self.elements.get(id).copied().unwrap_or_default()
    }

    /// Returns the per-element sizes, keyed by element identity.
    pub fn element_sizes(&self) -> &SizeLookup<K> {
        &self.elements
    }

    /// Returns the last reported container width, or zero if none was reported.
    pub fn container_width(&self) -> f32 {
        self.container.map(Size::width).unwrap_or_default()
    }

    /// Returns the number of measured elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if neither an element nor the container has been measured.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.container.is_none()
    }

    /// Records a measurement, overwriting any earlier one for the same key.
    ///
    /// Returns `true` if the stored value changed.
    pub fn insert(&mut self, key: MeasureKey<K>, size: Size) -> bool {
        let previous = match key {
            MeasureKey::Element(id) => self.elements.insert(id, size),
            MeasureKey::Container => self.container.replace(size),
        };
        previous != Some(size)
    }
}

impl<K: Eq + Hash> Default for SizeMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A report pushed by a rendering surface.
type Report<K> = (MeasureKey<K>, Size);

/// Cheap, cloneable handle for pushing size reports into a [`SizeChannel`].
///
/// Reporting is fire-and-forget: reports sent after the channel was dropped
/// are discarded. The handle is `Send` whenever `K` is, so independent
/// rendering threads can each hold one; their reports are serialized by the
/// channel's queue.
pub struct SizeReporter<K> {
    sender: Sender<Report<K>>,
}

impl<K> SizeReporter<K> {
    /// Reports the measured size of an element.
    pub fn report(&self, id: K, size: Size) {
        self.send(MeasureKey::Element(id), size);
    }

    /// Reports the measured size of the container.
    pub fn report_container(&self, size: Size) {
        self.send(MeasureKey::Container, size);
    }

    fn send(&self, key: MeasureKey<K>, size: Size) {
        if self.sender.send((key, size)).is_err() {
            debug!("Size channel closed, dropping report");
        }
    }
}

impl<K> Clone for SizeReporter<K> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<K> fmt::Debug for SizeReporter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeReporter").finish_non_exhaustive()
    }
}

/// Callback invoked with the complete merged map after every merge that changed it.
pub type Subscriber<K> = Box<dyn FnMut(&SizeMap<K>)>;

/// Aggregator of size reports.
///
/// # Examples
///
/// ```
/// # use chipflow::measure::SizeChannel;
/// # use chipflow_core::geometry::Size;
/// let mut channel = SizeChannel::new();
/// let reporter = channel.reporter();
///
/// reporter.report("a", Size::new(10.0, 5.0));
/// reporter.report("a", Size::new(12.0, 5.0));
/// reporter.report_container(Size::new(320.0, 0.0));
///
/// assert!(channel.flush());
/// assert_eq!(channel.sizes().size_of(&"a"), Size::new(12.0, 5.0));
/// assert_eq!(channel.sizes().container_width(), 320.0);
/// ```
pub struct SizeChannel<K: Eq + Hash> {
    sender: Sender<Report<K>>,
    receiver: Receiver<Report<K>>,
    sizes: SizeMap<K>,
    subscribers: Vec<Subscriber<K>>,
}

impl<K: Eq + Hash> SizeChannel<K> {
    /// Creates an empty channel.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sizes: SizeMap::new(),
            subscribers: Vec::new(),
        }
    }

    /// Returns a new reporter feeding this channel.
    pub fn reporter(&self) -> SizeReporter<K> {
        SizeReporter {
            sender: self.sender.clone(),
        }
    }

    /// Registers a subscriber notified with the full map after each changing merge.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&SizeMap<K>) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Returns the current merged map.
    pub fn sizes(&self) -> &SizeMap<K> {
        &self.sizes
    }

    /// Merges every buffered report, in arrival order.
    ///
    /// Subscribers are notified once, after the whole batch is merged, and
    /// only if the map changed.
    ///
    /// # Returns
    ///
    /// `true` if any stored size changed.
    pub fn flush(&mut self) -> bool {
        let mut merged = 0usize;
        let mut changed = false;

        for (key, size) in self.receiver.try_iter() {
            merged += 1;
            changed |= self.sizes.insert(key, size);
        }

        if merged > 0 {
            trace!(merged, changed; "Merged size reports");
        }

        if changed {
            debug!(
                elements = self.sizes.len(),
                container_width = self.sizes.container_width();
                "Size map updated"
            );
            for subscriber in &mut self.subscribers {
                subscriber(&self.sizes);
            }
        }

        changed
    }
}

impl<K: Eq + Hash> Default for SizeChannel<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for SizeChannel<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeChannel")
            .field("sizes", &self.sizes)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
