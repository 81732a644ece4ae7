use mdsync_tauri::{BackendController, BackendOptions};

fn main() {
    match BackendController::new(BackendOptions::default()) {
        Ok(mut controller) => match controller.snapshot() {
            Ok(snapshot) => {
                println!("GUI バックエンド プレースホルダ起動");
                println!("モード: {}", snapshot.mode);
                println!("最近のディレクトリ: {}", snapshot.recent_dirs.len());
            }
            Err(err) => eprintln!("スナップショット取得に失敗しました: {err}"),
        },
        Err(err) => {
            eprintln!("GUI バックエンドを初期化できません: {err}");
        }
    }
}
