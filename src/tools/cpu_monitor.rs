use sysinfo::System;

/// 預設的處理執行緒數量：邏輯核心數（至少 1）
#[must_use]
pub fn default_worker_count() -> usize {
    let mut system = System::new();
    system.refresh_cpu_all();
    system.cpus().len().max(1)
}

/// 設定值為 0 時改用預設執行緒數量
#[must_use]
pub fn resolve_worker_count(configured: usize) -> usize {
    if configured == 0 {
        default_worker_count()
    } else {
        configured
    }
}
