
/// Two-level TLB refills, write-backs, and shootdowns.
pub mod hierarchy;


/// Single TLB level: lookup, LRU victim choice, invalidation.
pub mod tlb;
