//! Spoken feedback.

pub const MENU_WELCOME: &str =
    "Sihirli Bahçeye hoş geldin! Karakter mi yapalım, oyun mu oynayalım?";
pub const SELECTION_WELCOME: &str =
    "Hangi oyunu oynamak istersin? Tavşan, Sincap, Baykuş... hepsi seni bekliyor!";

pub const WIN: &str = "Harika! Bildin!";
pub const RETRY: &str = "Yanlış oldu, tekrar dene!";
pub const GAME_OVER: &str = "Canların bitti, baştan deneyelim!";
pub const COMPLETED: &str = "Tebrikler! Oyun bitti!";

pub const DIFFERENCE_FOUND: &str = "Buldun!";
pub const PAIR_FOUND: &str = "Süper!";
pub const PIECE_PLACED: &str = "Harika!";
pub const WALL: &str = "Duvar var!";
pub const WRONG_SLOT: &str = "Oraya sığmadı!";
pub const MEMORY_GO: &str = "Şimdi eşlerini bul!";

pub const VIDEO_EMPTY: &str = "Bir şey söyle ya da yaz.";
pub const VIDEO_DRAWING: &str = "Sihirli kareleri çiziyorum...";
pub const VIDEO_READY: &str = "İşte hikayen!";
pub const VIDEO_ERROR: &str = "Hata oluştu.";

pub const CREATOR_GREETING: &str = "Yeni karakter yapalım! İster anlat, ister çiz!";
pub const CREATOR_WORKING: &str = "Sihir yapıyorum, bekle!";
pub const CREATOR_PREVIEW: &str = "İşte karakterin! Beğendin mi?";
pub const CREATOR_SAVED: &str = "Kaydettim!";
