//! Non-mutating vector updates for use inside reducers
//!
//! Each helper leaves its input alone and returns a new `Vec`.

/// `slice` with `item` added at the end
pub fn appended<T: Clone>(slice: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(slice.len() + 1);
    next.extend_from_slice(slice);
    next.push(item);
    next
}

/// `slice` without the element at `index`. Out of range returns a copy.
pub fn removed<T: Clone>(slice: &[T], index: usize) -> Vec<T> {
    if index >= slice.len() {
        return slice.to_vec();
    }
    let mut next = Vec::with_capacity(slice.len() - 1);
    next.extend_from_slice(&slice[..index]);
    next.extend_from_slice(&slice[index + 1..]);
    next
}

/// `slice` with the element at `index` replaced by `f(element)`.
/// Out of range returns a copy.
pub fn replaced<T, F>(slice: &[T], index: usize, f: F) -> Vec<T>
where
    T: Clone,
    F: FnOnce(&T) -> T,
{
    let mut next = slice.to_vec();
    if let Some(item) = slice.get(index) {
        next[index] = f(item);
    }
    next
}
