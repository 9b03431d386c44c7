//! SQL schema definitions, one per store.

/// Auth store: platform users.
pub const AUTH_SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    auth TEXT NOT NULL,
    profile TEXT,
    unique_id TEXT,
    public_id TEXT,
    email TEXT NOT NULL,
    first_name TEXT,
    last_name TEXT,
    phone_number TEXT,
    iso_code TEXT NOT NULL DEFAULT 'NG',
    email_verified INTEGER NOT NULL DEFAULT 0,
    mobile_verified INTEGER NOT NULL DEFAULT 0,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_auth ON users(auth);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_users_created ON users(created_at);
"#;

/// Service store: everything the savings and payments services persist.
pub const SERVICE_SCHEMA_V1: &str = r#"
-- ============================================================
-- Rails & balances
-- ============================================================

CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    public_id TEXT NOT NULL,
    reference TEXT,
    account_type TEXT NOT NULL,
    currency TEXT NOT NULL,
    processor TEXT NOT NULL,
    beneficiary_type TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    account_number TEXT,
    account_name TEXT,
    bank_name TEXT,
    bank_code TEXT,
    data TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS wallets (
    id TEXT PRIMARY KEY,
    public_id TEXT NOT NULL,
    auth TEXT NOT NULL,
    profile TEXT,
    currency TEXT NOT NULL,
    balance REAL NOT NULL DEFAULT 0,
    last_updated INTEGER,
    processor TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_wallets_auth ON wallets(auth);

-- ============================================================
-- Savings
-- ============================================================

CREATE TABLE IF NOT EXISTS stashes (
    id TEXT PRIMARY KEY,
    public_id TEXT NOT NULL,
    interest TEXT,
    auth TEXT NOT NULL,
    profile TEXT,
    name TEXT NOT NULL,
    save_type TEXT NOT NULL,
    currency TEXT NOT NULL,
    target REAL NOT NULL DEFAULT 0,
    current_interest REAL NOT NULL DEFAULT 0,
    start_date INTEGER NOT NULL,
    end_date INTEGER NOT NULL,
    automation TEXT,
    strict_status TEXT NOT NULL DEFAULT 'flex',
    start_save_on INTEGER,
    balance REAL NOT NULL DEFAULT 0,
    funding_sources TEXT NOT NULL DEFAULT '[]',
    processor TEXT NOT NULL DEFAULT 'mystash',
    interest_data TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stashes_auth ON stashes(auth);
CREATE INDEX IF NOT EXISTS idx_stashes_end ON stashes(end_date);

CREATE TABLE IF NOT EXISTS interests (
    id TEXT PRIMARY KEY,
    public_id TEXT NOT NULL UNIQUE,
    auth TEXT,
    profile TEXT,
    start_day INTEGER NOT NULL,
    end_day INTEGER NOT NULL,
    currency TEXT NOT NULL,
    percentage REAL NOT NULL,
    note TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- ============================================================
-- Money movement
-- ============================================================

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    public_id TEXT NOT NULL,
    auth TEXT NOT NULL,
    profile TEXT,
    currency TEXT NOT NULL,
    entry TEXT NOT NULL,
    destination TEXT,
    destination_type TEXT,
    source TEXT,
    source_type TEXT,
    amount REAL NOT NULL,
    balance REAL NOT NULL DEFAULT 0,
    fee REAL NOT NULL DEFAULT 0,
    narration TEXT,
    reference TEXT NOT NULL,
    debit_reference TEXT,
    t_ref TEXT,
    status TEXT NOT NULL,
    completed_at INTEGER,
    processor TEXT,
    meta TEXT,
    currency_pair TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    deleted_at INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_auth ON transactions(auth);
CREATE INDEX IF NOT EXISTS idx_transactions_reference ON transactions(reference);
CREATE INDEX IF NOT EXISTS idx_transactions_created ON transactions(created_at);

CREATE TABLE IF NOT EXISTS payments (
    id TEXT PRIMARY KEY,
    conversion TEXT,
    uid TEXT,
    amount REAL NOT NULL,
    card_type TEXT,
    last4 TEXT,
    verified INTEGER NOT NULL DEFAULT 0,
    meta_uid TEXT,
    meta_data TEXT,
    reference TEXT NOT NULL,
    payment_type TEXT NOT NULL,
    category TEXT,
    status TEXT NOT NULL,
    reason TEXT,
    user_uid TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_payments_meta_uid ON payments(meta_uid);
CREATE INDEX IF NOT EXISTS idx_payments_user ON payments(user_uid);
CREATE INDEX IF NOT EXISTS idx_payments_reference ON payments(reference);

CREATE TABLE IF NOT EXISTS transfers (
    id TEXT PRIMARY KEY,
    public_id TEXT NOT NULL,
    auth TEXT NOT NULL,
    profile TEXT,
    source_currency TEXT NOT NULL,
    funding_source TEXT,
    destination_currency TEXT NOT NULL,
    source_amount REAL NOT NULL,
    converted_amount REAL NOT NULL,
    country TEXT,
    payment_method TEXT,
    beneficiary TEXT NOT NULL DEFAULT '{}',
    account TEXT NOT NULL DEFAULT '{}',
    rate REAL NOT NULL,
    narration TEXT,
    currency_pair TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    active INTEGER NOT NULL DEFAULT 1,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transfers_auth ON transfers(auth);

CREATE TABLE IF NOT EXISTS rates (
    id TEXT PRIMARY KEY,
    public_id TEXT NOT NULL UNIQUE,
    rate REAL NOT NULL,
    source_currency TEXT NOT NULL,
    destination_currency TEXT NOT NULL,
    source TEXT NOT NULL DEFAULT 'mystash',
    min_amount REAL NOT NULL DEFAULT 0,
    fee REAL NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    is_default INTEGER NOT NULL DEFAULT 0,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

/// Dev store: records carried over from the previous platform.
pub const DEV_SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS legacy_users (
    id TEXT PRIMARY KEY,
    uid TEXT NOT NULL UNIQUE,
    name TEXT,
    email TEXT NOT NULL,
    phone_number TEXT,
    onboarding_stage TEXT,
    ambassador INTEGER NOT NULL DEFAULT 0,
    personas TEXT NOT NULL DEFAULT '[]',
    suspended INTEGER NOT NULL DEFAULT 0,
    disabled INTEGER NOT NULL DEFAULT 0,
    email_verified INTEGER NOT NULL DEFAULT 0,
    role TEXT,
    referral_code TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_legacy_users_email ON legacy_users(email);

CREATE TABLE IF NOT EXISTS legacy_user_statistics (
    uid TEXT PRIMARY KEY,
    referred_mandates_activated INTEGER NOT NULL DEFAULT 0,
    referred_mandates_created INTEGER NOT NULL DEFAULT 0,
    referrals INTEGER NOT NULL DEFAULT 0,
    withdrawals INTEGER NOT NULL DEFAULT 0,
    cash_reserve_stashes INTEGER NOT NULL DEFAULT 0,
    stashes INTEGER NOT NULL DEFAULT 0,
    mandate_breaks INTEGER NOT NULL DEFAULT 0,
    mandates INTEGER NOT NULL DEFAULT 0,
    active_mandates INTEGER NOT NULL DEFAULT 0,
    linked_cards INTEGER NOT NULL DEFAULT 0,
    linked_accounts INTEGER NOT NULL DEFAULT 0,
    deleted INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS legacy_transactions (
    id TEXT PRIMARY KEY,
    entry TEXT NOT NULL,
    amount REAL NOT NULL,
    narration TEXT,
    date INTEGER NOT NULL,
    balance REAL NOT NULL DEFAULT 0,
    transaction_id TEXT NOT NULL,
    uid TEXT NOT NULL,
    obp_id TEXT,
    obp_name TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_legacy_transactions_uid ON legacy_transactions(uid);
CREATE INDEX IF NOT EXISTS idx_legacy_transactions_date ON legacy_transactions(date);
"#;
