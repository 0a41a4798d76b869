//! 同一学生对同一练习的提交串行执行，保证次数检查与写入之间不被并发提交穿插

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

/// 键: (student_id, exercise_id)
static SUBMIT_LOCKS: Lazy<DashMap<(i64, i64), Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

/// 离开作用域时回收无人等待的锁，提交在等待中被取消也会执行
struct LockCleanup {
    key: (i64, i64),
    lock: Option<Arc<Mutex<()>>>,
}

impl Drop for LockCleanup {
    fn drop(&mut self) {
        // 先释放自己持有的引用，计数为 1 时只剩表中这一份
        drop(self.lock.take());
        SUBMIT_LOCKS.remove_if(&self.key, |_, held| Arc::strong_count(held) == 1);
    }
}

/// 持有 `(student_id, exercise_id)` 的锁执行 `fut`
pub async fn serialized<F, T>(student_id: i64, exercise_id: i64, fut: F) -> T
where
    F: Future<Output = T>,
{
    let key = (student_id, exercise_id);
    let mut cleanup = LockCleanup { key, lock: None };
    let lock = cleanup.lock.insert(
        SUBMIT_LOCKS
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone(),
    );

    let _guard = lock.lock().await;
    fut.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_never_overlaps() {
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let running = running.clone();
                let max_seen = max_seen.clone();
                tokio::spawn(async move {
                    serialized(900_001, 1, async {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(!SUBMIT_LOCKS.contains_key(&(900_001, 1)));
    }

    #[tokio::test]
    async fn test_returns_inner_value() {
        let value = serialized(900_002, 2, async { 41 + 1 }).await;
        assert_eq!(value, 42);
        assert!(!SUBMIT_LOCKS.contains_key(&(900_002, 2)));
    }

    #[tokio::test]
    async fn test_cancelled_submission_releases_entry() {
        let key = (900_003, 3);
        let task = tokio::spawn(serialized(key.0, key.1, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }));
        while !SUBMIT_LOCKS.contains_key(&key) {
            tokio::task::yield_now().await;
        }

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!SUBMIT_LOCKS.contains_key(&key));
    }
}
