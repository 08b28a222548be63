// ── Resource catalogue ──
//
// Every domain entity class the server broadcasts changes for, with the
// query cache keys that depend on it and its label in the shop UI.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// A class of domain entity whose changes are pushed over the live channel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Resource {
    Users,
    Customers,
    Products,
    Categories,
    ServiceTickets,
    Suppliers,
    Transactions,
    WarrantyClaims,
    Roles,
    Dashboard,
    Whatsapp,
    Inventory,
    PurchaseOrders,
    StockMovements,
}

impl Resource {
    /// Cache keys invalidated when this resource changes, in order.
    pub fn cache_keys(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["/api/users"],
            Self::Customers => &["/api/customers"],
            Self::Products => &["/api/products", "/api/products/low-stock"],
            Self::Categories => &["/api/categories"],
            Self::ServiceTickets => &["/api/service-tickets"],
            Self::Suppliers => &["/api/suppliers"],
            Self::Transactions => &["/api/transactions"],
            Self::WarrantyClaims => &["/api/warranty-claims"],
            Self::Roles => &["/api/roles"],
            Self::Dashboard => &["/api/dashboard/stats"],
            Self::Whatsapp => &["/api/whatsapp/config", "/api/whatsapp/status"],
            Self::Inventory => &["/api/products", "/api/products/low-stock"],
            Self::PurchaseOrders => &["/api/purchase-orders"],
            Self::StockMovements => &["/api/stock-movements", "/api/products"],
        }
    }

    /// Human-readable label shown in change toasts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "Pengguna",
            Self::Customers => "Pelanggan",
            Self::Products => "Produk",
            Self::Categories => "Kategori",
            Self::ServiceTickets => "Tiket Servis",
            Self::Suppliers => "Supplier",
            Self::Transactions => "Transaksi",
            Self::WarrantyClaims => "Klaim Garansi",
            Self::Roles => "Role",
            Self::Dashboard => "Dashboard",
            Self::Whatsapp => "WhatsApp",
            Self::Inventory => "Inventori",
            Self::PurchaseOrders => "Purchase Order",
            Self::StockMovements => "Pergerakan Stok",
        }
    }
}
